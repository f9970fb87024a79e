//! Helper functions for creating specific error types

use super::types::ClientError;

/// Helper functions for creating specific errors
impl ClientError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session(message.into())
    }

    pub fn token_refresh<S: Into<String>>(message: S) -> Self {
        Self::TokenRefresh(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_header<S: Into<String>>(message: S) -> Self {
        Self::InvalidHeader(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether a later attempt could succeed without operator action
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::HttpClient(e) => e.is_timeout() || e.is_connect(),
            ClientError::RefreshBackoff(_) | ClientError::TokenRefresh(_) => true,
            _ => false,
        }
    }
}
