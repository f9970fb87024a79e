//! Utility modules for the client
//!
//! - **error**: Error types, classification and backoff schedules
//! - **logging**: Subscriber setup and token masking

pub mod error;
pub mod logging;

pub use error::{ClientError, ErrorCategory, ErrorUtils, Result};

use rand::Rng;
use rand::distributions::Alphanumeric;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a unique request ID of the form `req_<millis>_<random>`
pub fn generate_request_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("req_{}_{}", current_timestamp_millis(), suffix)
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Format duration as human readable string
pub fn format_duration(duration_ms: u64) -> String {
    if duration_ms < 1000 {
        format!("{}ms", duration_ms)
    } else if duration_ms < 60_000 {
        format!("{:.1}s", duration_ms as f64 / 1000.0)
    } else if duration_ms < 3_600_000 {
        format!("{:.1}m", duration_ms as f64 / 60_000.0)
    } else {
        format!("{:.1}h", duration_ms as f64 / 3_600_000.0)
    }
}
