//! Metrics recorder

use super::bounded::{BoundedPush, MAX_RECORDED_REQUESTS};
use super::types::{MetricsSummary, RequestAttemptMetrics};
use crate::utils::format_duration;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, warn};

/// Requests slower than this are logged and counted as slow
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(5);

/// Keeps the most recent request outcomes, oldest evicted first
#[derive(Debug)]
pub struct MetricsRecorder {
    history: RwLock<VecDeque<RequestAttemptMetrics>>,
    capacity: usize,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_RECORDED_REQUESTS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append a finished request to the history
    pub fn record(&self, mut metrics: RequestAttemptMetrics) {
        if metrics.end_time.is_none() {
            metrics.end_time = Some(Utc::now());
        }

        let duration = metrics.duration().unwrap_or_default();
        if duration > SLOW_REQUEST_THRESHOLD {
            warn!(
                method = %metrics.method,
                endpoint = %metrics.endpoint,
                duration = %format_duration(duration.as_millis() as u64),
                attempts = metrics.attempts,
                "Slow request"
            );
        } else {
            debug!(
                method = %metrics.method,
                endpoint = %metrics.endpoint,
                duration_ms = duration.as_millis() as u64,
                status = ?metrics.status_code,
                "Request recorded"
            );
        }

        self.history.write().push_bounded(metrics, self.capacity);
    }

    /// Aggregate the current history
    pub fn summary(&self) -> MetricsSummary {
        let history = self.history.read();
        let total_requests = history.len();
        if total_requests == 0 {
            return MetricsSummary::default();
        }

        let mut total_ms = 0.0;
        let mut errors = 0usize;
        let mut slow_requests = 0usize;

        for metrics in history.iter() {
            let duration = metrics.duration().unwrap_or_default();
            total_ms += duration.as_secs_f64() * 1000.0;
            if duration > SLOW_REQUEST_THRESHOLD {
                slow_requests += 1;
            }
            if metrics.is_error() {
                errors += 1;
            }
        }

        MetricsSummary {
            total_requests,
            average_duration_ms: total_ms / total_requests as f64,
            error_rate: errors as f64 / total_requests as f64,
            slow_requests,
        }
    }

    /// The `n` most recent entries, newest last
    pub fn recent(&self, n: usize) -> Vec<RequestAttemptMetrics> {
        let history = self.history.read();
        let skip = history.len().saturating_sub(n);
        history.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.history.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.read().is_empty()
    }

    pub fn clear(&self) {
        self.history.write().clear();
    }
}
