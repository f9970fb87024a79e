//! Type conversions for ClientError

use super::types::ClientError;
use crate::core::types::{ApiError, ErrorCode};

impl From<&ClientError> for ApiError {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::HttpClient(e) if e.is_timeout() => ApiError::timeout(e.to_string()),
            ClientError::HttpClient(e) if e.is_connect() => ApiError::unreachable(e.to_string()),
            ClientError::HttpClient(e) => ApiError::network(e.to_string()),
            ClientError::SessionExpired | ClientError::Jwt(_) | ClientError::Session(_) => {
                ApiError::new(ErrorCode::Unauthorized, err.to_string())
            }
            ClientError::TokenRefresh(_) | ClientError::RefreshBackoff(_) => ApiError {
                retryable: true,
                ..ApiError::new(ErrorCode::Unauthorized, err.to_string())
            },
            ClientError::Validation(_) | ClientError::InvalidHeader(_) => {
                ApiError::new(ErrorCode::BadRequest, err.to_string())
            }
            ClientError::Serialization(_)
            | ClientError::Yaml(_)
            | ClientError::Config(_)
            | ClientError::Io(_)
            | ClientError::Internal(_) => ApiError::new(ErrorCode::UnknownError, err.to_string()),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::from(&err)
    }
}
