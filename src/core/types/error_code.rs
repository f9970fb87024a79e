//! Stable error codes
//!
//! Codes are strings on the wire (`"NOT_FOUND"`, `"ACCOUNT_LIMIT_EXCEEDED"`)
//! and a closed enum in code.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const PLAN_LIMIT_SUFFIX: &str = "_LIMIT_EXCEEDED";

/// Stable error code taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NetworkError,
    BackendUnreachable,
    BadRequest,
    Unauthorized,
    InvalidCredentials,
    Forbidden,
    NotFound,
    ValidationError,
    RateLimited,
    ServerError,
    ServiceUnavailable,
    RequestCancelled,
    RequestTimeout,
    UnknownError,
    /// Subscription plan quota violation, carrying the full backend code
    /// (e.g. `ACCOUNT_LIMIT_EXCEEDED`)
    PlanLimitExceeded(String),
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::BackendUnreachable => "BACKEND_UNREACHABLE",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::RequestCancelled => "REQUEST_CANCELLED",
            ErrorCode::RequestTimeout => "REQUEST_TIMEOUT",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
            ErrorCode::PlanLimitExceeded(code) => code,
        }
    }

    /// Parse a backend-supplied code. Unrecognized codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        let parsed = match code {
            "NETWORK_ERROR" => ErrorCode::NetworkError,
            "BACKEND_UNREACHABLE" => ErrorCode::BackendUnreachable,
            "BAD_REQUEST" => ErrorCode::BadRequest,
            "UNAUTHORIZED" => ErrorCode::Unauthorized,
            "INVALID_CREDENTIALS" => ErrorCode::InvalidCredentials,
            "FORBIDDEN" => ErrorCode::Forbidden,
            "NOT_FOUND" => ErrorCode::NotFound,
            "VALIDATION_ERROR" => ErrorCode::ValidationError,
            "RATE_LIMITED" => ErrorCode::RateLimited,
            "SERVER_ERROR" => ErrorCode::ServerError,
            "SERVICE_UNAVAILABLE" => ErrorCode::ServiceUnavailable,
            "REQUEST_CANCELLED" => ErrorCode::RequestCancelled,
            "REQUEST_TIMEOUT" => ErrorCode::RequestTimeout,
            "UNKNOWN_ERROR" => ErrorCode::UnknownError,
            other if is_plan_limit_code(other) => ErrorCode::PlanLimitExceeded(other.to_string()),
            _ => return None,
        };
        Some(parsed)
    }

    /// Map an HTTP status to its code
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorCode::BadRequest,
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            408 => ErrorCode::RequestTimeout,
            422 => ErrorCode::ValidationError,
            429 => ErrorCode::RateLimited,
            500 => ErrorCode::ServerError,
            503 => ErrorCode::ServiceUnavailable,
            _ => ErrorCode::UnknownError,
        }
    }

    pub fn is_plan_limit(&self) -> bool {
        matches!(self, ErrorCode::PlanLimitExceeded(_))
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ErrorCode::Unauthorized | ErrorCode::InvalidCredentials)
    }
}

/// Whether a raw code names a plan-limit violation
pub fn is_plan_limit_code(code: &str) -> bool {
    code.len() > PLAN_LIMIT_SUFFIX.len()
        && code.ends_with(PLAN_LIMIT_SUFFIX)
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ErrorCode::parse(&raw).unwrap_or(ErrorCode::UnknownError))
    }
}
