//! Error handling for the client
//!
//! This module defines the crate-internal error type.

#![allow(missing_docs)]

mod conversions;
mod helpers;
mod types;

// Re-export all public types
pub use types::{ClientError, Result};
