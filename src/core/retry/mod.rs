//! Retry/backoff engine
//!
//! Drives the attempts of one logical request: classification of each
//! outcome, a single forced token refresh on the first 401 and capped
//! exponential backoff for transient failures.

mod engine;
mod types;


pub use engine::RetryEngine;
pub use types::{AttemptOutcome, RetryReport, RetryState};
