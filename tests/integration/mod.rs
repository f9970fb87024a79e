//! Integration tests for secure-api-client
//!
//! These tests drive the public API against `wiremock` servers and verify
//! the interaction between the pipeline components.

pub mod brute_force_tests;
pub mod config_validation_tests;
pub mod error_handling_tests;
pub mod pipeline_tests;
#[cfg(feature = "sse")]
pub mod sse_tests;
pub mod token_refresh_tests;
