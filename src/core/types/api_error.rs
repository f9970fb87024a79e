//! Request failure type and backend error decoding
//!
//! Backend error bodies are decoded exactly once, here, into a closed set of
//! detail variants. Nothing downstream inspects raw JSON error shapes.

use super::error_code::{ErrorCode, is_plan_limit_code};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Failure outcome of a request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    /// Stable classified code
    pub code: ErrorCode,
    /// Human-readable message (backend-supplied when available)
    pub message: String,
    /// HTTP status, absent for network-level failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Decoded error details
    #[serde(skip_serializing_if = "ErrorDetails::is_none")]
    pub details: ErrorDetails,
    /// Whether the failure class is transient
    pub retryable: bool,
}

/// Structured error details
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ErrorDetails {
    #[default]
    None,
    /// Subscription quota violation
    PlanLimit(PlanLimit),
    /// Per-field validation messages
    Fields(BTreeMap<String, Vec<String>>),
    /// Anything else the backend attached
    Other(Value),
}

/// Plan-limit violation reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanLimit {
    pub code: String,
    pub message: Option<String>,
    pub limit: Option<u64>,
    pub current: Option<u64>,
    pub plan: Option<String>,
}

impl ErrorDetails {
    pub fn is_none(&self) -> bool {
        matches!(self, ErrorDetails::None)
    }

    pub fn plan_limit(&self) -> Option<&PlanLimit> {
        match self {
            ErrorDetails::PlanLimit(limit) => Some(limit),
            _ => None,
        }
    }

    /// Decode the `details` value of a backend error.
    ///
    /// Plan limits are recognized either from a nested `details.error.code`
    /// or from the top-level error code itself.
    pub fn decode(code: Option<&str>, details: Option<Value>) -> Self {
        let Some(details) = details else {
            return match code {
                Some(code) if is_plan_limit_code(code) => ErrorDetails::PlanLimit(PlanLimit {
                    code: code.to_string(),
                    message: None,
                    limit: None,
                    current: None,
                    plan: None,
                }),
                _ => ErrorDetails::None,
            };
        };

        if let Some(nested) = details.get("error") {
            if let Some(nested_code) = nested.get("code").and_then(Value::as_str) {
                if is_plan_limit_code(nested_code) {
                    return ErrorDetails::PlanLimit(PlanLimit::from_value(nested_code, nested, &details));
                }
            }
        }

        if let Some(code) = code.filter(|c| is_plan_limit_code(c)) {
            return ErrorDetails::PlanLimit(PlanLimit::from_value(code, &details, &details));
        }

        if let Some(fields) = decode_fields(&details) {
            return ErrorDetails::Fields(fields);
        }

        if details.is_null() {
            ErrorDetails::None
        } else {
            ErrorDetails::Other(details)
        }
    }
}

impl PlanLimit {
    fn from_value(code: &str, primary: &Value, fallback: &Value) -> Self {
        let field = |name: &str| primary.get(name).or_else(|| fallback.get(name));
        Self {
            code: code.to_string(),
            message: field("message").and_then(Value::as_str).map(str::to_string),
            limit: field("limit").and_then(Value::as_u64),
            current: field("current").and_then(Value::as_u64),
            plan: field("plan").and_then(Value::as_str).map(str::to_string),
        }
    }
}

fn decode_fields(details: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let object = details.as_object()?;
    if object.is_empty() {
        return None;
    }
    let mut fields = BTreeMap::new();
    for (name, value) in object {
        let messages = match value {
            Value::String(message) => vec![message.clone()],
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()?,
            _ => return None,
        };
        fields.insert(name.clone(), messages);
    }
    Some(fields)
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            details: ErrorDetails::None,
            retryable: false,
        }
    }

    /// Build an error from an HTTP status and an optional decoded backend body.
    ///
    /// The status decides the code unless the backend names a recognized code
    /// of its own. Plan limits always win and are never retryable.
    pub fn from_status(status: u16, backend: Option<BackendError>) -> Self {
        let backend = backend.unwrap_or_default();
        let details = ErrorDetails::decode(backend.code.as_deref(), backend.details);

        let code = match details.plan_limit() {
            Some(limit) => ErrorCode::PlanLimitExceeded(limit.code.clone()),
            None => backend
                .code
                .as_deref()
                .and_then(ErrorCode::parse)
                .unwrap_or_else(|| ErrorCode::from_status(status)),
        };

        let retryable = !code.is_plan_limit() && is_retryable_status(status);
        let message = backend
            .message
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        Self {
            code,
            message,
            status: Some(status),
            details,
            retryable,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            retryable: true,
            ..Self::new(ErrorCode::NetworkError, message)
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            retryable: true,
            ..Self::new(ErrorCode::BackendUnreachable, message)
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            retryable: true,
            ..Self::new(ErrorCode::RequestTimeout, message)
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RequestCancelled, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            status: Some(429),
            ..Self::new(ErrorCode::RateLimited, message)
        }
    }

    pub fn is_plan_limit(&self) -> bool {
        self.code.is_plan_limit()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Statuses the retry engine may re-attempt
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || status >= 500
}

/// `error` object of a failed response envelope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendError {
    pub code: Option<String>,
    pub message: Option<String>,
    pub details: Option<Value>,
}

impl BackendError {
    /// Accepts `{code, message, details}` objects as well as bare strings
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(message) => Some(Self {
                message: Some(message.clone()),
                ..Self::default()
            }),
            Value::Object(object) => Some(Self {
                code: object.get("code").and_then(Value::as_str).map(str::to_string),
                message: object
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                details: object.get("details").cloned(),
            }),
            _ => None,
        }
    }
}
