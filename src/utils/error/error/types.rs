//! Error types for the client

use thiserror::Error;

/// Result type alias for the client
pub type Result<T> = std::result::Result<T, ClientError>;

/// Crate-internal error type.
///
/// Request failures are never surfaced through this type; they resolve to
/// [`crate::core::types::ApiError`] values instead.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JWT decoding errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Session lookup errors
    #[error("Session error: {0}")]
    Session(String),

    /// Token refresh errors
    #[error("Token refresh error: {0}")]
    TokenRefresh(String),

    /// Refresh attempted inside the backoff window
    #[error("Token refresh backing off for another {0:?}")]
    RefreshBackoff(std::time::Duration),

    /// Refresh failure budget exhausted
    #[error("Session expired")]
    SessionExpired,

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid header name or value
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
