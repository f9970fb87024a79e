//! Session and credential protection configuration

use super::*;
use crate::utils::error::recovery::Backoff;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token refresh configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRefreshConfig {
    /// Run the background refresh loop
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Refresh when the token expires within this many seconds
    #[serde(default = "default_refresh_threshold")]
    pub threshold_secs: u64,
    /// Background check interval in seconds
    #[serde(default = "default_refresh_check_interval")]
    pub check_interval_secs: u64,
    /// Consecutive failures before the session is considered expired
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff unit after a failed refresh, in milliseconds
    #[serde(default = "default_refresh_retry_delay")]
    pub retry_delay_ms: u64,
    /// Backoff cap in milliseconds
    #[serde(default = "default_refresh_max_retry_delay")]
    pub max_retry_delay_ms: u64,
}

impl Default for TokenRefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_secs: default_refresh_threshold(),
            check_interval_secs: default_refresh_check_interval(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_refresh_retry_delay(),
            max_retry_delay_ms: default_refresh_max_retry_delay(),
        }
    }
}

impl TokenRefreshConfig {
    pub fn threshold(&self) -> Duration {
        Duration::from_secs(self.threshold_secs)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// `retry_delay × failure_count`, capped
    pub fn backoff(&self) -> Backoff {
        Backoff::linear(
            Duration::from_millis(self.retry_delay_ms),
            Duration::from_millis(self.max_retry_delay_ms),
        )
    }
}

/// Brute-force protection for authentication attempts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Attempts allowed per window
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,
    /// Attempt counting window in seconds
    #[serde(default = "default_login_attempt_window")]
    pub login_attempt_window_secs: u64,
    /// Block length once the attempts are exhausted, in seconds
    #[serde(default = "default_block_duration")]
    pub block_duration_secs: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_login_attempts: default_max_login_attempts(),
            login_attempt_window_secs: default_login_attempt_window(),
            block_duration_secs: default_block_duration(),
        }
    }
}

impl SecurityConfig {
    pub fn login_attempt_window(&self) -> Duration {
        Duration::from_secs(self.login_attempt_window_secs)
    }

    pub fn block_duration(&self) -> Duration {
        Duration::from_secs(self.block_duration_secs)
    }
}
