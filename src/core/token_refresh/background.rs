//! Background refresh loop

use super::coordinator::CoordinatorInner;
use super::types::RefreshTrigger;
use crate::core::session::Session;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Delay before the next check: the check interval, or sooner if the session
/// crosses the refresh threshold first
pub(super) fn next_check_delay(
    session: &Session,
    now: DateTime<Utc>,
    threshold: Duration,
    check_interval: Duration,
) -> Duration {
    let until_threshold = session.time_until_expiry(now).saturating_sub(threshold);
    // Sessions shorter-lived than the threshold fall back to the interval
    if until_threshold.is_zero() {
        check_interval
    } else {
        check_interval.min(until_threshold)
    }
}

pub(super) fn spawn_refresh_loop(
    inner: Arc<CoordinatorInner>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let wait = check_once(&inner).await;
            debug!(wait_ms = wait.as_millis() as u64, "Next token check scheduled");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Token refresh loop exiting");
    })
}

/// Inspect the session, refresh it if needed and return the next delay
async fn check_once(inner: &Arc<CoordinatorInner>) -> Duration {
    let threshold = inner.config.threshold();
    let interval = inner.config.check_interval();

    let session = match inner.provider.current_session().await {
        Ok(Some(session)) => session,
        Ok(None) => {
            debug!("No session to keep fresh");
            return interval;
        }
        Err(e) => {
            warn!("Session lookup failed during refresh check: {}", e);
            return interval;
        }
    };

    let now = Utc::now();
    if !session.needs_refresh(now, threshold) {
        return next_check_delay(&session, now, threshold, interval);
    }

    match inner.refresh(RefreshTrigger::Background).await {
        Ok(refreshed) => next_check_delay(&refreshed, Utc::now(), threshold, interval),
        Err(e) => {
            debug!("Background refresh did not complete: {}", e);
            interval
        }
    }
}
