//! Error classification and recovery utilities
//!
//! This module provides the shared backoff schedule, the central error
//! classifier and user-facing recovery actions.

mod backoff;
mod classifier;
mod types;

pub use backoff::{Backoff, BackoffKind};
pub use classifier::AppError;
pub use types::{RecoveryAction, Severity};
