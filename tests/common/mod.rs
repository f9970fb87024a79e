//! Common test utilities for secure-api-client
//!
//! - Client configuration pointed at a mock server
//! - Response envelope builders
//! - Scripted session providers
//! - Custom assertions
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{fixtures, test_config};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let server = wiremock::MockServer::start().await;
//!     let client = SecureApiClient::new(test_config(&server)).unwrap();
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

pub use fixtures::{ScriptedSessionProvider, error_body, success_body};

use secure_api_client::Config;
use wiremock::MockServer;

/// Configuration aimed at `server` with millisecond-scale backoff and the
/// background refresh loop disabled
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.retry_base_delay_ms = 5;
    config.api.retry_max_delay_ms = 20;
    config.token_refresh.enabled = false;
    config.token_refresh.retry_delay_ms = 10;
    config.token_refresh.max_retry_delay_ms = 50;
    config
}
