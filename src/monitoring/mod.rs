//! Monitoring
//!
//! In-memory request metrics for the client.

pub mod metrics;

pub use metrics::{MetricsRecorder, MetricsSummary, RequestAttemptMetrics};
