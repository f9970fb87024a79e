//! Token refresh types

use crate::core::session::Session;
use crate::utils::error::ClientError;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, Shared};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Output shared by every caller joined to one refresh
pub(super) type RefreshOutput = std::result::Result<Session, String>;

pub(super) type InFlightRefresh = Shared<BoxFuture<'static, RefreshOutput>>;

/// Mutable refresh bookkeeping, guarded by the coordinator
#[derive(Default)]
pub(super) struct RefreshState {
    pub(super) in_flight: Option<InFlightRefresh>,
    pub(super) last_refresh: Option<DateTime<Utc>>,
    pub(super) failure_count: u32,
    pub(super) next_retry: Option<Instant>,
}

impl RefreshState {
    pub(super) fn is_refreshing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub(super) fn reset_failures(&mut self) {
        self.failure_count = 0;
        self.next_retry = None;
    }
}

/// Point-in-time view of the refresh state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSnapshot {
    pub is_refreshing: bool,
    pub last_refresh: Option<DateTime<Utc>>,
    pub failure_count: u32,
    /// Time left in the backoff window, if one is active
    pub retry_in: Option<Duration>,
}

/// What started a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The background loop saw an expiring session
    Background,
    /// The retry engine hit a 401
    Forced,
    /// A caller asked directly
    Manual,
}

impl RefreshTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshTrigger::Background => "background",
            RefreshTrigger::Forced => "forced",
            RefreshTrigger::Manual => "manual",
        }
    }
}

/// Refresh counters
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RefreshStats {
    pub total_refreshes: u64,
    pub successful_refreshes: u64,
    pub failed_refreshes: u64,
    pub background_refreshes: u64,
    pub forced_refreshes: u64,
    /// Calls that joined a refresh already in flight
    pub joined_refreshes: u64,
    pub last_failure: Option<DateTime<Utc>>,
}

/// Hooks for refresh lifecycle events. Every method defaults to a no-op.
pub trait RefreshObserver: Send + Sync {
    fn on_refresh_success(&self, _session: &Session) {}

    fn on_refresh_failure(&self, _error: &ClientError, _failure_count: u32) {}

    /// The failure budget is exhausted; the user must sign in again
    fn on_session_expired(&self) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RefreshObserver for NoopObserver {}
