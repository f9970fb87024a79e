//! Metrics types

use crate::core::types::HttpMethod;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Outcome of one logical request, across all of its attempts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestAttemptMetrics {
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Backoff retries consumed
    pub retry_count: u32,
    /// Network attempts made
    pub attempts: u32,
    pub endpoint: String,
    pub method: HttpMethod,
    pub status_code: Option<u16>,
    /// Error code when the request failed
    pub error: Option<String>,
}

impl RequestAttemptMetrics {
    /// Metrics for a request starting now
    pub fn start(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            start_time: Utc::now(),
            end_time: None,
            retry_count: 0,
            attempts: 0,
            endpoint: endpoint.into(),
            method,
            status_code: None,
            error: None,
        }
    }

    /// Mark the request finished now
    pub fn finish(&mut self, status_code: Option<u16>, error: Option<String>) {
        self.end_time = Some(Utc::now());
        self.status_code = status_code;
        self.error = error;
    }

    /// `end - start`, if finished
    pub fn duration(&self) -> Option<Duration> {
        self.end_time
            .map(|end| (end - self.start_time).to_std().unwrap_or(Duration::ZERO))
    }

    /// Failed when an error was recorded or the status is 4xx/5xx
    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.status_code.is_some_and(|status| status >= 400)
    }
}

/// Aggregates over the recorded history
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub total_requests: usize,
    pub average_duration_ms: f64,
    /// Share of failed requests, between 0 and 1
    pub error_rate: f64,
    pub slow_requests: usize,
}
