//! Brute force protection for login-style operations

use crate::config::models::SecurityConfig;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// Why an attempt was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockReason {
    /// This attempt crossed the limit and started a block
    MaxAttemptsExceeded,
    /// A block is already active
    TemporarilyBlocked,
}

/// Outcome of [`BruteForceGuard::check`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BruteForceCheck {
    pub allowed: bool,
    pub remaining_attempts: u32,
    pub reason: Option<BlockReason>,
    /// Time until the block lifts
    pub retry_after: Option<Duration>,
}

impl BruteForceCheck {
    fn allowed(remaining_attempts: u32) -> Self {
        Self {
            allowed: true,
            remaining_attempts,
            reason: None,
            retry_after: None,
        }
    }

    fn blocked(reason: BlockReason, retry_after: Duration) -> Self {
        Self {
            allowed: false,
            remaining_attempts: 0,
            reason: Some(reason),
            retry_after: Some(retry_after),
        }
    }
}

/// Tracks attempts for a single key
struct AttemptTracker {
    attempts: u32,
    window_start: Instant,
    blocked_until: Option<Instant>,
}

/// Counts attempts per key inside a window and blocks keys that exceed the limit
pub struct BruteForceGuard {
    attempts: DashMap<String, AttemptTracker>,
    max_attempts: u32,
    attempt_window: Duration,
    block_duration: Duration,
    /// Refused attempts, for monitoring
    blocked_count: AtomicU64,
}

impl Default for BruteForceGuard {
    fn default() -> Self {
        Self::from_config(&SecurityConfig::default())
    }
}

impl BruteForceGuard {
    pub fn new(max_attempts: u32, attempt_window: Duration, block_duration: Duration) -> Self {
        Self {
            attempts: DashMap::new(),
            max_attempts,
            attempt_window,
            block_duration,
            blocked_count: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.max_login_attempts,
            config.login_attempt_window(),
            config.block_duration(),
        )
    }

    /// Count an attempt for `key` and decide whether it may proceed
    pub fn check(&self, key: &str) -> BruteForceCheck {
        let now = Instant::now();

        let mut entry = self
            .attempts
            .entry(key.to_string())
            .or_insert_with(|| AttemptTracker {
                attempts: 0,
                window_start: now,
                blocked_until: None,
            });
        let tracker = entry.value_mut();

        if let Some(blocked_until) = tracker.blocked_until {
            if now < blocked_until {
                self.blocked_count.fetch_add(1, Ordering::Relaxed);
                return BruteForceCheck::blocked(
                    BlockReason::TemporarilyBlocked,
                    blocked_until - now,
                );
            }
            tracker.blocked_until = None;
            tracker.attempts = 0;
            tracker.window_start = now;
        }

        if now.duration_since(tracker.window_start) > self.attempt_window {
            tracker.attempts = 0;
            tracker.window_start = now;
        }

        tracker.attempts += 1;

        if tracker.attempts > self.max_attempts {
            tracker.blocked_until = Some(now + self.block_duration);
            self.blocked_count.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Key {} blocked for {} seconds after {} attempts",
                key,
                self.block_duration.as_secs(),
                self.max_attempts
            );
            return BruteForceCheck::blocked(BlockReason::MaxAttemptsExceeded, self.block_duration);
        }

        BruteForceCheck::allowed(self.max_attempts - tracker.attempts)
    }

    /// A successful attempt clears the key's history
    pub fn record_success(&self, key: &str) {
        self.attempts.remove(key);
    }

    pub fn reset(&self, key: &str) {
        self.attempts.remove(key);
    }

    pub fn blocked_attempts(&self) -> u64 {
        self.blocked_count.load(Ordering::Relaxed)
    }

    pub fn tracked_keys(&self) -> usize {
        self.attempts.len()
    }

    /// Drop entries whose window and block have both passed
    pub fn cleanup(&self) {
        let now = Instant::now();

        self.attempts.retain(|_, tracker| {
            now.duration_since(tracker.window_start) <= self.attempt_window
                || tracker.blocked_until.is_some_and(|until| until > now)
        });
    }
}
