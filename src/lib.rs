//! # secure-api-client
//!
//! A resilient HTTP request orchestration layer for JSON REST backends.
//!
//! Every request goes through the same pipeline: a fixed-window rate-limit
//! gate, in-flight deduplication of identical calls, and a retry engine that
//! attaches security headers on each attempt, backs off on transient failures
//! and forces a single token refresh on the first 401. Outcomes are recorded
//! in a bounded metrics history.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use secure_api_client::{Config, SecureApiClient, StaticSessionProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/client.yaml").await?;
//!     let client = SecureApiClient::builder(config)
//!         .session_provider(Arc::new(StaticSessionProvider::from_token("eyJ...")))
//!         .build()?;
//!
//!     match client.get::<serde_json::Value>("/accounts").await {
//!         Ok(response) => println!("{}", response.data),
//!         Err(error) => eprintln!("{}: {}", error.code, error.message),
//!     }
//!
//!     println!("{:?}", client.metrics_summary());
//!     client.shutdown().await;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{AppError, Backoff, ClientError, RecoveryAction, Result, Severity};

pub use core::brute_force::{BlockReason, BruteForceCheck, BruteForceGuard};
pub use core::client::{SecureApiClient, SecureApiClientBuilder};
pub use core::dedup::{RequestDeduplicator, request_key};
pub use core::headers::HeaderProvider;
pub use core::rate_limiter::{RateLimitResult, RateLimiter};
pub use core::retry::{RetryEngine, RetryReport};
pub use core::session::{Session, SessionProvider, StaticSessionProvider};
#[cfg(feature = "sse")]
pub use core::sse::{EventSourceHandle, ReadyState, SseEvent, SseHandlers, SseOptions, SseParser};
pub use core::token_refresh::{RefreshObserver, TokenRefreshCoordinator};
pub use core::types::{
    ApiError, ApiResult, ApiSuccess, ErrorCode, ErrorDetails, HttpMethod, Pagination,
    RequestOptions, TrafficClass,
};
pub use monitoring::metrics::{MetricsRecorder, MetricsSummary, RequestAttemptMetrics};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information stamped by the build script
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
