//! Core client implementation

use crate::config::Config;
use crate::core::brute_force::BruteForceGuard;
use crate::core::dedup::{RequestDeduplicator, request_key};
use crate::core::headers::HeaderProvider;
use crate::core::rate_limiter::RateLimiter;
use crate::core::retry::RetryEngine;
use crate::core::token_refresh::TokenRefreshCoordinator;
use crate::core::types::{ApiError, ApiResult, HttpMethod, RequestOptions, TrafficClass};
use crate::monitoring::metrics::{MetricsRecorder, MetricsSummary, RequestAttemptMetrics};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub(super) struct ClientInner {
    pub(super) config: Config,
    pub(super) http: reqwest::Client,
    pub(super) headers: Arc<HeaderProvider>,
    pub(super) limiter: Arc<RateLimiter>,
    pub(super) dedup: RequestDeduplicator<ApiResult<Value>>,
    pub(super) engine: RetryEngine,
    pub(super) metrics: MetricsRecorder,
    pub(super) refresh: Option<Arc<TokenRefreshCoordinator>>,
    pub(super) brute_force: BruteForceGuard,
    pub(super) cleanup_task: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for ClientInner {
    fn drop(&mut self) {
        if let Some(handle) = self.cleanup_task.get_mut().take() {
            handle.abort();
        }
    }
}

/// HTTP client context holding the limiter, deduplicator, metrics and the
/// optional refresh coordinator.
///
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct SecureApiClient {
    pub(super) inner: Arc<ClientInner>,
}

impl std::fmt::Debug for SecureApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureApiClient")
            .field("api_url", &self.inner.config.api.api_url())
            .field("pending", &self.inner.dedup.pending_count())
            .field("token_refresh", &self.inner.refresh.is_some())
            .finish()
    }
}

impl SecureApiClient {
    /// Send a request with a JSON body already in [`Value`] form.
    ///
    /// Never fails outside the returned [`ApiResult`].
    pub async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        if !options.skip_rate_limit {
            let key = options
                .rate_limit_key
                .clone()
                .unwrap_or_else(|| endpoint.to_string());
            let class = options
                .traffic_class
                .unwrap_or_else(|| TrafficClass::for_endpoint(endpoint));

            if !self.inner.limiter.check_rate_limit(&key, class) {
                let mut metrics = RequestAttemptMetrics::start(method, endpoint);
                let error = ApiError::rate_limited(format!(
                    "Too many {} requests, please slow down",
                    class.as_str()
                ));
                metrics.finish(None, Some(error.code.to_string()));
                self.inner.metrics.record(metrics);
                return Err(error);
            }
        }

        if options.deduplicate && self.inner.config.api.deduplicate {
            let key = request_key(method, endpoint, body.as_ref());
            let inner = Arc::clone(&self.inner);
            let endpoint = endpoint.to_string();
            self.inner
                .dedup
                .execute(key, move || async move {
                    inner.execute(method, &endpoint, body, options).await
                })
                .await
        } else {
            self.inner.execute(method, endpoint, body, options).await
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.inner.metrics
    }

    pub fn metrics_summary(&self) -> MetricsSummary {
        self.inner.metrics.summary()
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }

    pub fn brute_force(&self) -> &BruteForceGuard {
        &self.inner.brute_force
    }

    pub fn header_provider(&self) -> &HeaderProvider {
        &self.inner.headers
    }

    pub fn token_refresh(&self) -> Option<&Arc<TokenRefreshCoordinator>> {
        self.inner.refresh.as_ref()
    }

    /// Requests currently shared through deduplication
    pub fn pending_requests(&self) -> usize {
        self.inner.dedup.pending_count()
    }

    /// Stop background work: the refresh loop and the rate-limit sweeper
    pub async fn shutdown(&self) {
        if let Some(refresh) = &self.inner.refresh {
            refresh.stop().await;
        }
        if let Some(handle) = self.inner.cleanup_task.lock().take() {
            handle.abort();
        }
        info!("Client background tasks stopped");
    }
}

impl ClientInner {
    /// Run the retry engine for one logical request and record its metrics
    pub(super) async fn execute(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResult<Value> {
        let url = self.config.api.endpoint_url(endpoint);
        let timeout = options.timeout.unwrap_or_else(|| self.config.api.timeout());
        let mut metrics = RequestAttemptMetrics::start(method, endpoint);

        debug!(%method, %url, "Sending request");

        let body = body.as_ref();
        let options = &options;
        let url = url.as_str();
        let refresh = self.refresh.as_ref();

        let report = self
            .engine
            .run(
                options.max_retries,
                options.skip_auth,
                move || self.send_once(method, url, body, options, timeout),
                move || async move {
                    match refresh {
                        Some(coordinator) => coordinator.force_refresh().await.is_ok(),
                        None => false,
                    }
                },
            )
            .await;

        metrics.attempts = report.attempts;
        metrics.retry_count = report.retry_count;
        let status = report
            .status_code
            .or_else(|| report.result.as_ref().err().and_then(|e| e.status));
        metrics.finish(
            status,
            report.result.as_ref().err().map(|e| e.code.to_string()),
        );
        self.metrics.record(metrics);

        report.result
    }
}
