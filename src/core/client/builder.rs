//! Client construction

use super::client::{ClientInner, SecureApiClient};
use crate::config::Config;
use crate::core::brute_force::BruteForceGuard;
use crate::core::dedup::RequestDeduplicator;
use crate::core::headers::HeaderProvider;
use crate::core::rate_limiter::RateLimiter;
use crate::core::retry::RetryEngine;
use crate::core::session::SessionProvider;
use crate::core::token_refresh::{NoopObserver, RefreshObserver, TokenRefreshCoordinator};
use crate::monitoring::metrics::MetricsRecorder;
use crate::utils::error::{ClientError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Builder for [`SecureApiClient`]
#[derive(Default)]
pub struct SecureApiClientBuilder {
    config: Config,
    session: Option<Arc<dyn SessionProvider>>,
    observer: Option<Arc<dyn RefreshObserver>>,
    http: Option<reqwest::Client>,
}

impl SecureApiClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Session source for bearer tokens and refreshes
    pub fn session_provider(mut self, provider: Arc<dyn SessionProvider>) -> Self {
        self.session = Some(provider);
        self
    }

    /// Receiver of refresh lifecycle events
    pub fn refresh_observer(mut self, observer: Arc<dyn RefreshObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Use a preconfigured reqwest client instead of the default one
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Validate the configuration and assemble the client.
    ///
    /// Background tasks start only when called inside a Tokio runtime.
    pub fn build(self) -> Result<SecureApiClient> {
        let config = self.config;
        config.validate()?;

        let http = match self.http {
            Some(client) => client,
            None => reqwest::Client::builder()
                .cookie_store(true)
                .connect_timeout(config.api.timeout())
                .user_agent(format!("secure-api-client/{}", config.api.client_version))
                .build()
                .map_err(|e| ClientError::config(format!("Failed to create HTTP client: {}", e)))?,
        };

        let headers = Arc::new(HeaderProvider::new(&config.api, self.session.clone()));
        let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        let engine = RetryEngine::new(config.api.backoff(), config.api.max_retries);

        let refresh = self.session.map(|provider| {
            Arc::new(TokenRefreshCoordinator::build(
                config.token_refresh.clone(),
                provider,
                self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
                Some(Arc::clone(&headers)),
            ))
        });

        let in_runtime = tokio::runtime::Handle::try_current().is_ok();
        if !in_runtime {
            warn!("No Tokio runtime; background refresh and rate-limit cleanup are disabled");
        }

        let cleanup_task = if in_runtime && config.rate_limit.enabled {
            Some(limiter.start_cleanup_task())
        } else {
            None
        };

        if let Some(coordinator) = &refresh {
            if in_runtime && config.token_refresh.enabled {
                coordinator.start();
            }
        }

        info!(
            api_url = %config.api.api_url(),
            token_refresh = refresh.is_some(),
            rate_limit = config.rate_limit.enabled,
            "Secure API client ready"
        );

        let brute_force = BruteForceGuard::from_config(&config.security);

        Ok(SecureApiClient {
            inner: Arc::new(ClientInner {
                config,
                http,
                headers,
                limiter,
                dedup: RequestDeduplicator::new(),
                engine,
                metrics: MetricsRecorder::new(),
                refresh,
                brute_force,
                cleanup_task: Mutex::new(cleanup_task),
            }),
        })
    }
}

impl SecureApiClient {
    pub fn builder(config: Config) -> SecureApiClientBuilder {
        SecureApiClientBuilder::new(config)
    }

    /// Client without a session provider
    pub fn new(config: Config) -> Result<Self> {
        Self::builder(config).build()
    }
}
