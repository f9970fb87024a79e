//! Rate limiting configuration

use super::*;
use crate::core::types::TrafficClass;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fixed-window quotas per traffic class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// General API requests per window
    #[serde(default = "default_api_requests")]
    pub api_requests: u32,
    /// Authentication requests per window
    #[serde(default = "default_auth_requests")]
    pub auth_requests: u32,
    /// Upload requests per window
    #[serde(default = "default_upload_requests")]
    pub upload_requests: u32,
    /// Expired-entry sweep interval in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: default_window_secs(),
            api_requests: default_api_requests(),
            auth_requests: default_auth_requests(),
            upload_requests: default_upload_requests(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

impl RateLimitConfig {
    /// Quota for a traffic class
    pub fn limit_for(&self, class: TrafficClass) -> u32 {
        match class {
            TrafficClass::Api => self.api_requests,
            TrafficClass::Auth => self.auth_requests,
            TrafficClass::Upload => self.upload_requests,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}
