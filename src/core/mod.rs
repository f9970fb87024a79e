//! Core request orchestration
//!
//! Leaf components first: session and header resolution, the rate limiter,
//! the in-flight deduplicator, the retry engine and the token refresh
//! coordinator. [`client`] wires them into one request pipeline.

pub mod brute_force;
pub mod client;
pub mod dedup;
pub mod headers;
pub mod rate_limiter;
pub mod retry;
pub mod session;
#[cfg(feature = "sse")]
pub mod sse;
pub mod token_refresh;
pub mod types;
