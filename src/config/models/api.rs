//! API endpoint and transport configuration

use super::*;
use crate::utils::error::recovery::Backoff;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime environment of the host application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
    Test,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin, e.g. `https://api.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Version segment appended as `/api/<version>`
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff base delay in milliseconds
    #[serde(default = "default_base_delay")]
    pub retry_base_delay_ms: u64,
    /// Backoff cap in milliseconds
    #[serde(default = "default_max_delay")]
    pub retry_max_delay_ms: u64,
    /// Sent as `X-Client-Version`
    #[serde(default = "default_client_version")]
    pub client_version: String,
    #[serde(default)]
    pub environment: Environment,
    /// Share in-flight identical requests
    #[serde(default = "default_true")]
    pub deduplicate: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            timeout: default_timeout(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_base_delay(),
            retry_max_delay_ms: default_max_delay(),
            client_version: default_client_version(),
            environment: Environment::default(),
            deduplicate: true,
        }
    }
}

impl ApiConfig {
    /// `<base_url>/api/<version>`
    pub fn api_url(&self) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    /// Full URL for an endpoint path
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_url(), endpoint.trim_start_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Retry schedule for the request engine
    pub fn backoff(&self) -> Backoff {
        Backoff::exponential(
            Duration::from_millis(self.retry_base_delay_ms),
            Duration::from_millis(self.retry_max_delay_ms),
        )
    }
}
