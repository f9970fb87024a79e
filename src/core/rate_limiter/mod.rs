//! Rate Limiting Implementation
//!
//! Fixed-window request counting per logical key, with quotas per traffic class

mod limiter;
mod types;
mod utils;


// Re-export public types
pub use limiter::RateLimiter;
pub use types::RateLimitResult;
