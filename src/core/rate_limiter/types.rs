//! Rate limiter types and data structures

use tokio::time::Instant;

/// Rate limit result
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Current request count in the window
    pub current_count: u32,
    /// Maximum requests allowed
    pub limit: u32,
    /// Remaining requests in the window
    pub remaining: u32,
    /// Time until the window resets (in seconds)
    pub reset_after_secs: u64,
}

/// Fixed-window counter for one key
#[derive(Debug, Clone)]
pub(super) struct RateLimitEntry {
    pub(super) count: u32,
    pub(super) reset_time: Instant,
}

impl RateLimitEntry {
    pub(super) fn new(reset_time: Instant) -> Self {
        Self {
            count: 1,
            reset_time,
        }
    }

    pub(super) fn is_expired(&self, now: Instant) -> bool {
        now > self.reset_time
    }
}
