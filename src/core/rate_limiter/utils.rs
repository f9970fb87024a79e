//! Utility functions for rate limiter

use super::limiter::RateLimiter;
use super::types::RateLimitResult;
use crate::core::types::TrafficClass;
use std::sync::{Arc, Weak};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

impl RateLimiter {
    /// Remove entries whose window has passed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!("Removed {} expired rate limit entries", removed);
        }
        removed
    }

    /// Start the periodic cleanup task.
    ///
    /// The task holds only a weak reference and ends once the limiter is gone.
    pub fn start_cleanup_task(self: &Arc<Self>) -> JoinHandle<()> {
        let limiter: Weak<Self> = Arc::downgrade(self);
        let period = self.config.cleanup_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                match limiter.upgrade() {
                    Some(limiter) => {
                        limiter.cleanup();
                    }
                    None => break,
                }
            }
        })
    }

    /// Get current status for a key without counting a request
    pub fn status(&self, key: &str, class: TrafficClass) -> Option<RateLimitResult> {
        if !self.config.enabled {
            return None;
        }

        let limit = self.config.limit_for(class);
        let now = Instant::now();
        let entry = self.entries.get(key)?;
        if entry.is_expired(now) {
            return None;
        }

        Some(RateLimitResult {
            allowed: entry.count < limit,
            current_count: entry.count,
            limit,
            remaining: limit.saturating_sub(entry.count),
            reset_after_secs: entry.reset_time.saturating_duration_since(now).as_secs(),
        })
    }

    /// Forget a key
    pub fn reset(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of tracked keys
    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Get the configured limit for a class
    pub fn limit(&self, class: TrafficClass) -> u32 {
        self.config.limit_for(class)
    }
}
