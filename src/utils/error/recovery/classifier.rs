//! Central error classifier
//!
//! Turns request failures and crate errors into [`AppError`] values carrying
//! severity, retryability, a user-facing message and recovery actions.

use super::types::{RecoveryAction, Severity};
use crate::core::types::{ApiError, ErrorCode, ErrorDetails};
use crate::utils::error::ClientError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

/// Classified, immutable application error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub user_message: String,
    pub severity: Severity,
    pub recoverable: bool,
    pub retryable: bool,
    #[serde(skip_serializing_if = "ErrorDetails::is_none")]
    pub details: ErrorDetails,
    pub timestamp: DateTime<Utc>,
}

struct Classification {
    severity: Severity,
    recoverable: bool,
    retryable: bool,
    user_message: &'static str,
}

fn classify(code: &ErrorCode) -> Classification {
    let (severity, recoverable, retryable, user_message) = match code {
        ErrorCode::NetworkError => (
            Severity::High,
            true,
            true,
            "Network connection problem. Check your connection and try again.",
        ),
        ErrorCode::BackendUnreachable => (
            Severity::High,
            true,
            true,
            "We can't reach our servers right now. Please reload the page.",
        ),
        ErrorCode::BadRequest => (
            Severity::Low,
            true,
            false,
            "The request was invalid. Please check your input.",
        ),
        ErrorCode::Unauthorized => (
            Severity::Medium,
            true,
            false,
            "Your session has expired. Please log in again.",
        ),
        ErrorCode::InvalidCredentials => (
            Severity::Medium,
            true,
            false,
            "Invalid email or password.",
        ),
        ErrorCode::Forbidden => (
            Severity::Medium,
            false,
            false,
            "You don't have permission to do that.",
        ),
        ErrorCode::NotFound => (
            Severity::Low,
            false,
            false,
            "The requested item could not be found.",
        ),
        ErrorCode::ValidationError => (
            Severity::Low,
            true,
            false,
            "Some fields need your attention.",
        ),
        ErrorCode::RateLimited => (
            Severity::Medium,
            true,
            true,
            "Too many requests. Please wait a moment and try again.",
        ),
        ErrorCode::ServerError => (
            Severity::High,
            true,
            true,
            "Something went wrong on our end. Please try again.",
        ),
        ErrorCode::ServiceUnavailable => (
            Severity::High,
            true,
            true,
            "The service is temporarily unavailable. Please try again shortly.",
        ),
        ErrorCode::RequestCancelled => (Severity::Low, true, false, "The request was cancelled."),
        ErrorCode::RequestTimeout => (
            Severity::Medium,
            true,
            true,
            "The request took too long. Please try again.",
        ),
        ErrorCode::UnknownError => (
            Severity::High,
            false,
            false,
            "An unexpected error occurred.",
        ),
        ErrorCode::PlanLimitExceeded(_) => (
            Severity::Medium,
            true,
            false,
            "You've reached your plan's limit. Upgrade to continue.",
        ),
    };
    Classification {
        severity,
        recoverable,
        retryable,
        user_message,
    }
}

impl AppError {
    /// Classify a request failure
    pub fn from_api_error(api_error: &ApiError) -> Self {
        let class = classify(&api_error.code);
        let user_message = match api_error.details.plan_limit() {
            Some(limit) => limit
                .message
                .clone()
                .unwrap_or_else(|| class.user_message.to_string()),
            None => class.user_message.to_string(),
        };

        Self {
            code: api_error.code.clone(),
            message: api_error.message.clone(),
            user_message,
            severity: class.severity,
            recoverable: class.recoverable,
            retryable: class.retryable,
            details: api_error.details.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Classify a crate-internal error.
    ///
    /// Configuration and internal failures are critical and not recoverable by
    /// the user.
    pub fn from_client_error(client_error: &ClientError) -> Self {
        let mut app_error = Self::from_api_error(&ApiError::from(client_error));
        if matches!(
            client_error,
            ClientError::Config(_) | ClientError::Internal(_) | ClientError::Io(_)
        ) {
            app_error.severity = Severity::Critical;
            app_error.recoverable = false;
            app_error.retryable = false;
        }
        app_error
    }

    pub fn is_plan_limit(&self) -> bool {
        self.code.is_plan_limit()
    }

    /// Actions to offer the user, most relevant first
    pub fn recovery_actions(&self) -> Vec<RecoveryAction> {
        let mut actions = Vec::new();

        match &self.code {
            code if code.is_auth_failure() => actions.push(RecoveryAction::LogIn),
            ErrorCode::PlanLimitExceeded(_) => actions.push(RecoveryAction::ViewPlans),
            ErrorCode::BackendUnreachable => actions.push(RecoveryAction::Reload),
            ErrorCode::NotFound => actions.push(RecoveryAction::GoBack),
            _ => {}
        }

        if self.retryable && !actions.contains(&RecoveryAction::Reload) {
            actions.push(RecoveryAction::TryAgain);
        }

        if self.severity == Severity::Critical {
            actions.push(RecoveryAction::ContactSupport);
        }

        actions
    }

    /// Emit the error at a level matching its severity
    pub fn log(&self) {
        match self.severity {
            Severity::Low => info!(code = %self.code, "{}", self.message),
            Severity::Medium => warn!(code = %self.code, "{}", self.message),
            Severity::High | Severity::Critical => {
                error!(code = %self.code, severity = ?self.severity, "{}", self.message)
            }
        }
    }
}

impl From<&ApiError> for AppError {
    fn from(api_error: &ApiError) -> Self {
        Self::from_api_error(api_error)
    }
}

impl From<&ClientError> for AppError {
    fn from(client_error: &ClientError) -> Self {
        Self::from_client_error(client_error)
    }
}
