//! Request metrics
//!
//! A bounded history of recent request outcomes and aggregates over it.

mod bounded;
mod recorder;
mod types;


pub use bounded::MAX_RECORDED_REQUESTS;
pub use recorder::{MetricsRecorder, SLOW_REQUEST_THRESHOLD};
pub use types::{MetricsSummary, RequestAttemptMetrics};
