//! Core configuration validators
//!
//! Validation implementations for the API transport and logging sections.

use super::trait_def::Validate;
use super::url::validate_base_url;
use crate::config::models::*;
use tracing::debug;

impl Validate for ApiConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating API configuration");

        validate_base_url(&self.base_url, "API base URL")?;

        if self.api_version.trim().is_empty() {
            return Err("API version cannot be empty".to_string());
        }

        if self.api_version.contains('/') {
            return Err("API version must be a single path segment".to_string());
        }

        if self.timeout == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.timeout > 3600 {
            return Err("Request timeout should not exceed 1 hour".to_string());
        }

        if self.max_retries > 10 {
            return Err("Max retries seems too high (>10)".to_string());
        }

        if self.retry_base_delay_ms == 0 {
            return Err("Retry base delay must be greater than 0".to_string());
        }

        if self.retry_max_delay_ms < self.retry_base_delay_ms {
            return Err("Retry max delay must be >= retry base delay".to_string());
        }

        if self.client_version.trim().is_empty() {
            return Err("Client version cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.window_secs == 0 {
            return Err("Rate limit window must be greater than 0".to_string());
        }

        if self.api_requests == 0 || self.auth_requests == 0 || self.upload_requests == 0 {
            return Err("Rate limit quotas must be greater than 0".to_string());
        }

        if self.cleanup_interval_secs == 0 {
            return Err("Rate limit cleanup interval must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(()),
            // Full filter directives such as `secure_api_client=debug`
            directive if directive.contains('=') => Ok(()),
            other => Err(format!("Unknown log level: {}", other)),
        }
    }
}
