//! Secure API client
//!
//! The request pipeline: rate-limit gate, in-flight deduplication, the retry
//! engine with per-attempt security headers, then metrics.

mod builder;
mod client;
#[cfg(feature = "sse")]
mod events;
mod transport;
mod verbs;


pub use builder::SecureApiClientBuilder;
pub use client::SecureApiClient;
