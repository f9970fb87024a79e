//! Error Handling utilities
//!
//! This module provides the crate error type, HTTP status classification and
//! the error recovery layer.

pub mod error;
pub mod recovery;
pub mod utils;

// Re-export commonly used types and functions
pub use error::*;
pub use recovery::*;
pub use utils::{ErrorCategory, ErrorUtils};
