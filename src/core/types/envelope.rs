//! Response envelope decoding
//!
//! The backend answers `{ success: true, data, message?, pagination? }` or
//! `{ success: false, error: { code, message, details? } }`.

use super::api_error::{ApiError, BackendError};
use super::error_code::ErrorCode;
use super::pagination::Pagination;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a request: never a panic, never a propagated transport error
pub type ApiResult<T> = std::result::Result<ApiSuccess<T>, ApiError>;

/// Successful response payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiSuccess<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub status: u16,
}

impl ApiSuccess<Value> {
    /// Deserialize the untyped payload into `T`
    pub fn into_typed<T: DeserializeOwned>(self) -> ApiResult<T> {
        let data = serde_json::from_value(self.data).map_err(|e| {
            ApiError::new(
                ErrorCode::UnknownError,
                format!("Failed to decode response data: {}", e),
            )
        })?;
        Ok(ApiSuccess {
            data,
            message: self.message,
            pagination: self.pagination,
            status: self.status,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawEnvelope {
    success: Option<bool>,
    data: Option<Value>,
    message: Option<String>,
    pagination: Option<Pagination>,
    error: Option<Value>,
}

/// Decode a response body received with `status`.
///
/// Empty bodies are accepted (`data = null`). A 2xx body that explicitly says
/// `success: false` is treated as a failure. Bodies that are not envelopes are
/// passed through as `data`.
pub fn decode_envelope(status: u16, body: &[u8]) -> ApiResult<Value> {
    let parsed: Option<Value> = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        serde_json::from_slice(body).ok()
    };

    let is_success_status = (200..300).contains(&status);

    let raw = parsed
        .as_ref()
        .filter(|value| value.is_object())
        .and_then(|value| RawEnvelope::deserialize(value).ok());

    match (is_success_status, raw) {
        (true, Some(envelope)) if envelope.success == Some(false) => Err(ApiError::from_status(
            status,
            envelope.error.as_ref().and_then(BackendError::from_value),
        )),
        (true, Some(envelope)) if envelope.success.is_some() => Ok(ApiSuccess {
            data: envelope.data.unwrap_or(Value::Null),
            message: envelope.message,
            pagination: envelope.pagination,
            status,
        }),
        (true, _) => Ok(ApiSuccess {
            data: parsed.unwrap_or(Value::Null),
            message: None,
            pagination: None,
            status,
        }),
        (false, envelope) => Err(ApiError::from_status(
            status,
            envelope
                .and_then(|e| e.error)
                .as_ref()
                .and_then(BackendError::from_value),
        )),
    }
}
