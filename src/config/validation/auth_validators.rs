//! Authentication configuration validators
//!
//! Validation implementations for token refresh and brute-force protection.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for TokenRefreshConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating token refresh configuration");

        if self.threshold_secs == 0 {
            return Err("Refresh threshold must be greater than 0".to_string());
        }

        if self.threshold_secs >= 86400 {
            return Err("Refresh threshold must be less than 24 hours".to_string());
        }

        if self.check_interval_secs == 0 {
            return Err("Refresh check interval must be greater than 0".to_string());
        }

        if self.max_retries == 0 {
            return Err("Refresh max retries must be greater than 0".to_string());
        }

        if self.max_retry_delay_ms < self.retry_delay_ms {
            return Err("Refresh max retry delay must be >= retry delay".to_string());
        }

        Ok(())
    }
}

impl Validate for SecurityConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_login_attempts == 0 {
            return Err("Max login attempts must be greater than 0".to_string());
        }

        if self.login_attempt_window_secs == 0 {
            return Err("Login attempt window must be greater than 0".to_string());
        }

        if self.block_duration_secs == 0 {
            return Err("Block duration must be greater than 0".to_string());
        }

        Ok(())
    }
}
