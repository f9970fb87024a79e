//! In-flight request deduplication
//!
//! Concurrent callers with the same request key share a single execution.

use crate::core::types::HttpMethod;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

type SharedRequest<T> = Shared<BoxFuture<'static, T>>;

struct InFlight<T> {
    generation: u64,
    handle: WeakShared<BoxFuture<'static, T>>,
}

type InFlightMap<T> = DashMap<String, InFlight<T>>;

/// Removes the map entry once the shared future settles or every waiter is gone
struct EntryGuard<T> {
    map: Weak<InFlightMap<T>>,
    key: String,
    generation: u64,
}

impl<T> Drop for EntryGuard<T> {
    fn drop(&mut self) {
        if let Some(map) = self.map.upgrade() {
            map.remove_if(&self.key, |_, entry| entry.generation == self.generation);
        }
    }
}

/// Build the dedup key `METHOD:endpoint:JSON(body)`, an absent body counting as `{}`.
///
/// `serde_json::Value` objects keep their keys sorted, so field order does not
/// split keys.
pub fn request_key(method: HttpMethod, endpoint: &str, body: Option<&Value>) -> String {
    match body {
        Some(body) => format!("{}:{}:{}", method, endpoint, body),
        None => format!("{}:{}:{{}}", method, endpoint),
    }
}

/// Map of in-flight requests keyed by request key
pub struct RequestDeduplicator<T: Clone> {
    in_flight: Arc<InFlightMap<T>>,
    next_generation: AtomicU64,
}

impl<T: Clone> Default for RequestDeduplicator<T> {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }
}

impl<T: Clone> std::fmt::Debug for RequestDeduplicator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDeduplicator")
            .field("pending", &self.in_flight.len())
            .finish()
    }
}

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `make_request` unless an identical request is already in flight,
    /// in which case await that one instead.
    ///
    /// Lookup and registration happen without suspending, so two callers can
    /// never both start an execution for one key.
    pub async fn execute<F, Fut>(&self, key: String, make_request: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(mut occupied) => match occupied.get().handle.upgrade() {
                Some(existing) => {
                    debug!(key = %key, "Joining in-flight request");
                    existing
                }
                None => {
                    let (entry, shared) = self.register(key, make_request);
                    match entry {
                        Some(entry) => {
                            occupied.insert(entry);
                        }
                        None => {
                            occupied.remove();
                        }
                    }
                    shared
                }
            },
            Entry::Vacant(vacant) => {
                let (entry, shared) = self.register(key, make_request);
                if let Some(entry) = entry {
                    vacant.insert(entry);
                }
                shared
            }
        };

        shared.await
    }

    fn register<F, Fut>(&self, key: String, make_request: F) -> (Option<InFlight<T>>, SharedRequest<T>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let guard = EntryGuard {
            map: Arc::downgrade(&self.in_flight),
            key,
            generation,
        };
        let request = make_request();

        let shared = async move {
            let _guard = guard;
            request.await
        }
        .boxed()
        .shared();

        let entry = shared
            .downgrade()
            .map(|handle| InFlight { generation, handle });
        (entry, shared)
    }

    /// Number of requests currently in flight
    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Forget every in-flight entry; running requests still complete for
    /// their current waiters
    pub fn clear(&self) {
        self.in_flight.clear();
    }
}
