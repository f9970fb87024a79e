//! Single-flight token refresh with failure backoff

use super::background::spawn_refresh_loop;
use super::types::{
    NoopObserver, RefreshObserver, RefreshOutput, RefreshSnapshot, RefreshState, RefreshStats,
    RefreshTrigger,
};
use crate::config::models::TokenRefreshConfig;
use crate::core::headers::HeaderProvider;
use crate::core::session::{Session, SessionProvider};
use crate::utils::error::recovery::Backoff;
use crate::utils::error::{ClientError, Result};
use chrono::Utc;
use futures::future::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

pub(super) struct CoordinatorInner {
    pub(super) config: TokenRefreshConfig,
    pub(super) provider: Arc<dyn SessionProvider>,
    observer: Arc<dyn RefreshObserver>,
    token_cache: Option<Arc<HeaderProvider>>,
    backoff: Backoff,
    state: Mutex<RefreshState>,
    stats: RwLock<RefreshStats>,
    shutdown: watch::Sender<bool>,
}

impl CoordinatorInner {
    /// Join the refresh in flight or start one
    pub(super) async fn refresh(self: &Arc<Self>, trigger: RefreshTrigger) -> Result<Session> {
        let shared = {
            let mut state = self.state.lock();

            if let Some(in_flight) = &state.in_flight {
                self.stats.write().joined_refreshes += 1;
                debug!(trigger = trigger.as_str(), "Joining in-flight token refresh");
                in_flight.clone()
            } else {
                if state.failure_count >= self.config.max_retries {
                    drop(state);
                    self.handle_session_expired();
                    return Err(ClientError::SessionExpired);
                }

                if let Some(next_retry) = state.next_retry {
                    let now = Instant::now();
                    if now < next_retry {
                        let wait = next_retry - now;
                        debug!(wait_ms = wait.as_millis() as u64, "Token refresh backing off");
                        return Err(ClientError::RefreshBackoff(wait));
                    }
                }

                let inner = Arc::clone(self);
                let refresh = async move { inner.perform_refresh(trigger).await }
                    .boxed()
                    .shared();
                state.in_flight = Some(refresh.clone());
                refresh
            }
        };

        shared.await.map_err(ClientError::TokenRefresh)
    }

    async fn perform_refresh(self: Arc<Self>, trigger: RefreshTrigger) -> RefreshOutput {
        info!(trigger = trigger.as_str(), "Refreshing session token");
        {
            let mut stats = self.stats.write();
            stats.total_refreshes += 1;
            match trigger {
                RefreshTrigger::Background => stats.background_refreshes += 1,
                RefreshTrigger::Forced => stats.forced_refreshes += 1,
                RefreshTrigger::Manual => {}
            }
        }

        let result = self.provider.refresh_session().await;

        match result {
            Ok(session) => {
                {
                    let mut state = self.state.lock();
                    state.in_flight = None;
                    state.reset_failures();
                    state.last_refresh = Some(Utc::now());
                }
                self.stats.write().successful_refreshes += 1;

                if let Some(cache) = &self.token_cache {
                    cache.cache_token(Some(session.access_token.clone()));
                }

                info!(expires_at = %session.expires_at, "Session token refreshed");
                self.observer.on_refresh_success(&session);
                Ok(session)
            }
            Err(e) => {
                let failure_count = {
                    let mut state = self.state.lock();
                    state.in_flight = None;
                    state.failure_count += 1;
                    state.next_retry = Some(Instant::now() + self.backoff.delay(state.failure_count));
                    state.failure_count
                };
                {
                    let mut stats = self.stats.write();
                    stats.failed_refreshes += 1;
                    stats.last_failure = Some(Utc::now());
                }

                warn!(
                    failure_count,
                    max_retries = self.config.max_retries,
                    "Token refresh failed: {}",
                    e
                );
                self.observer.on_refresh_failure(&e, failure_count);

                if failure_count >= self.config.max_retries {
                    self.handle_session_expired();
                }
                Err(e.to_string())
            }
        }
    }

    fn handle_session_expired(&self) {
        error!("Token refresh budget exhausted, session expired");
        self.observer.on_session_expired();
        // Stops the background loop
        self.shutdown.send_replace(true);
    }

    fn snapshot(&self) -> RefreshSnapshot {
        let state = self.state.lock();
        let now = Instant::now();
        RefreshSnapshot {
            is_refreshing: state.is_refreshing(),
            last_refresh: state.last_refresh,
            failure_count: state.failure_count,
            retry_in: state
                .next_retry
                .filter(|next| *next > now)
                .map(|next| next - now),
        }
    }
}

/// Owns the refresh state and the background refresh task.
///
/// Dropping the coordinator aborts the background task.
pub struct TokenRefreshCoordinator {
    inner: Arc<CoordinatorInner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for TokenRefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefreshCoordinator")
            .field("config", &self.inner.config)
            .field("state", &self.inner.snapshot())
            .field("running", &self.is_running())
            .finish()
    }
}

impl TokenRefreshCoordinator {
    pub fn new(config: TokenRefreshConfig, provider: Arc<dyn SessionProvider>) -> Self {
        Self::build(config, provider, Arc::new(NoopObserver), None)
    }

    /// Create a coordinator that reports to `observer` and pushes refreshed
    /// tokens into `token_cache`
    pub fn build(
        config: TokenRefreshConfig,
        provider: Arc<dyn SessionProvider>,
        observer: Arc<dyn RefreshObserver>,
        token_cache: Option<Arc<HeaderProvider>>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        let backoff = config.backoff();
        Self {
            inner: Arc::new(CoordinatorInner {
                config,
                provider,
                observer,
                token_cache,
                backoff,
                state: Mutex::new(RefreshState::default()),
                stats: RwLock::new(RefreshStats::default()),
                shutdown,
            }),
            task: Mutex::new(None),
        }
    }

    /// Start the background loop. No-op if it is already running.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        self.inner.shutdown.send_replace(false);
        let shutdown = self.inner.shutdown.subscribe();
        *task = Some(spawn_refresh_loop(Arc::clone(&self.inner), shutdown));
        info!(
            threshold_secs = self.inner.config.threshold_secs,
            check_interval_secs = self.inner.config.check_interval_secs,
            "Token refresh loop started"
        );
    }

    /// Stop the background loop and wait for it to finish
    pub async fn stop(&self) {
        self.inner.shutdown.send_replace(true);
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Token refresh loop ended abnormally: {}", e);
                }
            }
            info!("Token refresh loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Refresh now, joining any refresh already in flight.
    ///
    /// Fails fast with [`ClientError::SessionExpired`] once the failure budget
    /// is spent and with [`ClientError::RefreshBackoff`] inside the backoff
    /// window.
    pub async fn refresh_token(&self) -> Result<Session> {
        self.inner.refresh(RefreshTrigger::Manual).await
    }

    /// Clear failure bookkeeping, then refresh
    pub async fn force_refresh(&self) -> Result<Session> {
        self.inner.state.lock().reset_failures();
        self.inner.refresh(RefreshTrigger::Forced).await
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.state.lock().is_refreshing()
    }

    pub fn snapshot(&self) -> RefreshSnapshot {
        self.inner.snapshot()
    }

    pub fn stats(&self) -> RefreshStats {
        self.inner.stats.read().clone()
    }

    pub fn config(&self) -> &TokenRefreshConfig {
        &self.inner.config
    }
}

impl Drop for TokenRefreshCoordinator {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}
