use crate::core::types::ApiError;

/// Coarse failure category of an HTTP outcome
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorCategory {
    ClientError,    // 4xx errors
    ServerError,    // 5xx errors
    TransientError, // Retryable without a response
    PermanentError, // Non-retryable errors
}

pub struct ErrorUtils;

impl ErrorUtils {
    /// Categorize an HTTP status code
    pub fn categorize_status(status_code: u16) -> ErrorCategory {
        match status_code {
            429 => ErrorCategory::TransientError,
            400..=499 => ErrorCategory::ClientError,
            500..=599 => ErrorCategory::ServerError,
            _ => ErrorCategory::PermanentError,
        }
    }

    /// Classify a transport failure that produced no response
    pub fn map_transport_error(error: &reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::timeout(format!("Request timed out: {}", error))
        } else if error.is_connect() {
            ApiError::unreachable(format!("Backend unreachable: {}", error))
        } else {
            ApiError::network(format!("Network error: {}", error))
        }
    }
}
