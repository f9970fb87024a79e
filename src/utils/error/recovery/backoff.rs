//! Backoff schedule shared by the retry engine and the token refresh coordinator

use std::time::Duration;

/// Growth of the delay with each attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackoffKind {
    /// `base × multiplier^attempt`
    Exponential { multiplier: f64 },
    /// `base × attempt`
    Linear,
}

/// Capped backoff schedule
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    /// Delay unit
    pub base_delay: Duration,
    /// Upper bound for any computed delay
    pub max_delay: Duration,
    /// Growth strategy
    pub kind: BackoffKind,
    /// Add ±5% jitter
    pub jitter: bool,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::exponential(Duration::from_millis(1000), Duration::from_millis(10_000))
    }
}

impl Backoff {
    /// Doubling schedule: `min(base × 2^attempt, max)`
    pub fn exponential(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            kind: BackoffKind::Exponential { multiplier: 2.0 },
            jitter: false,
        }
    }

    /// Linear schedule: `min(base × attempt, max)`
    pub fn linear(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            kind: BackoffKind::Linear,
            jitter: false,
        }
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Delay before the attempt following `attempt` failures
    pub fn delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let raw_ms = match self.kind {
            BackoffKind::Exponential { multiplier } => base_ms * multiplier.powi(attempt as i32),
            BackoffKind::Linear => base_ms * attempt as f64,
        };

        let delay_ms = if self.jitter {
            let jitter_factor = 0.1;
            raw_ms + raw_ms * jitter_factor * (rand::random::<f64>() - 0.5)
        } else {
            raw_ms
        };

        let capped = delay_ms.min(self.max_delay.as_millis() as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }
}
