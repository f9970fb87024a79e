//! Core rate limiter implementation

use super::types::{RateLimitEntry, RateLimitResult};
use crate::config::models::rate_limit::RateLimitConfig;
use crate::core::types::TrafficClass;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::warn;

/// Fixed-window rate limiter.
///
/// The first request for a key opens a window of `config.window()`. Requests
/// inside the window are counted until the class limit is reached; later ones
/// are rejected without being counted. Once the window has passed the entry
/// is replaced, so bursts of up to twice the limit across a boundary are
/// possible.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Rate limit configuration
    pub(super) config: RateLimitConfig,
    /// Entries by logical request key
    pub(super) entries: Arc<DashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Count a request against `key` and report whether it may proceed
    pub fn check_rate_limit(&self, key: &str, class: TrafficClass) -> bool {
        self.check_and_record(key, class).allowed
    }

    /// Atomically check and record a request.
    ///
    /// The shard lock is held for the whole check, so concurrent callers for
    /// one key cannot both take the last slot.
    pub fn check_and_record(&self, key: &str, class: TrafficClass) -> RateLimitResult {
        let limit = self.config.limit_for(class);

        if !self.config.enabled {
            return RateLimitResult {
                allowed: true,
                current_count: 0,
                limit,
                remaining: limit,
                reset_after_secs: 0,
            };
        }

        let now = Instant::now();
        let window = self.config.window();

        let (allowed, current_count, reset_time) = match self.entries.entry(key.to_string()) {
            Entry::Vacant(vacant) => {
                let entry = RateLimitEntry::new(now + window);
                let reset_time = entry.reset_time;
                vacant.insert(entry);
                (true, 1, reset_time)
            }
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.is_expired(now) {
                    *entry = RateLimitEntry::new(now + window);
                    (true, 1, entry.reset_time)
                } else if entry.count >= limit {
                    (false, entry.count, entry.reset_time)
                } else {
                    entry.count += 1;
                    (true, entry.count, entry.reset_time)
                }
            }
        };

        let reset_after_secs = reset_time.saturating_duration_since(now).as_secs();

        if !allowed {
            warn!(
                key = %key,
                class = class.as_str(),
                limit,
                reset_after_secs,
                "Rate limit exceeded"
            );
        }

        RateLimitResult {
            allowed,
            current_count,
            limit,
            remaining: limit.saturating_sub(current_count),
            reset_after_secs,
        }
    }
}
