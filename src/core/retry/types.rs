//! Retry engine types

use crate::core::types::{ApiError, ApiResult};
use bytes::Bytes;
use serde_json::Value;

/// What a single network attempt produced
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// The backend answered, whatever the status
    Response { status: u16, body: Bytes },
    /// No response: connection failure, timeout, cancellation
    Transport(ApiError),
}

impl AttemptOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptOutcome::Response { status, .. } => Some(*status),
            AttemptOutcome::Transport(_) => None,
        }
    }
}

/// Engine state, exposed for tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Idle,
    Attempting,
    RetryScheduled,
    Success,
    Failed,
}

impl RetryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryState::Idle => "idle",
            RetryState::Attempting => "attempting",
            RetryState::RetryScheduled => "retry_scheduled",
            RetryState::Success => "success",
            RetryState::Failed => "failed",
        }
    }
}

/// Final result of a request together with how it was reached
#[derive(Debug, Clone)]
pub struct RetryReport {
    pub result: ApiResult<Value>,
    /// Network attempts made, including the one after a forced refresh
    pub attempts: u32,
    /// Backoff retries consumed
    pub retry_count: u32,
    /// Status of the last response, if any
    pub status_code: Option<u16>,
    pub refreshed: bool,
}
