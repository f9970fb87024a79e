//! Configuration data models
//!
//! This module defines all configuration structures used by the client.

#![allow(missing_docs)]

pub mod api;
pub mod auth;
pub mod logging;
pub mod rate_limit;

// Re-export all configuration types
pub use api::*;
pub use auth::*;
pub use logging::*;
pub use rate_limit::*;

/// Default API base URL
pub fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

pub fn default_api_version() -> String {
    "v1".to_string()
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum retry attempts
pub fn default_max_retries() -> u32 {
    3
}

pub fn default_base_delay() -> u64 {
    1000
}

pub fn default_max_delay() -> u64 {
    10_000
}

pub fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub fn default_true() -> bool {
    true
}

/// Fixed rate-limit window (15 minutes)
pub fn default_window_secs() -> u64 {
    900
}

pub fn default_api_requests() -> u32 {
    100
}

pub fn default_auth_requests() -> u32 {
    5
}

pub fn default_upload_requests() -> u32 {
    10
}

pub fn default_cleanup_interval() -> u64 {
    300
}

/// Refresh when the token expires within 5 minutes
pub fn default_refresh_threshold() -> u64 {
    300
}

pub fn default_refresh_check_interval() -> u64 {
    60
}

pub fn default_refresh_retry_delay() -> u64 {
    5000
}

pub fn default_refresh_max_retry_delay() -> u64 {
    60_000
}

pub fn default_max_login_attempts() -> u32 {
    5
}

pub fn default_login_attempt_window() -> u64 {
    900
}

pub fn default_block_duration() -> u64 {
    900
}

pub fn default_log_level() -> String {
    "info".to_string()
}
