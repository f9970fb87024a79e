//! Retry loop

use super::types::{AttemptOutcome, RetryReport, RetryState};
use crate::core::types::decode_envelope;
use crate::utils::error::recovery::Backoff;
use std::future::Future;
use tracing::{debug, warn};

/// Executes attempts until success, a permanent failure or an exhausted budget
#[derive(Debug, Clone)]
pub struct RetryEngine {
    backoff: Backoff,
    max_retries: u32,
}

impl Default for RetryEngine {
    fn default() -> Self {
        Self::new(Backoff::default(), 3)
    }
}

impl RetryEngine {
    pub fn new(backoff: Backoff, max_retries: u32) -> Self {
        Self {
            backoff,
            max_retries,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Run `attempt` until it succeeds or a failure is final.
    ///
    /// A 401 on the first attempt calls `refresh` once when `skip_auth` is
    /// false; if that returns true the request is repeated immediately
    /// without consuming retry budget. Retryable failures (5xx, 429, no
    /// response) back off and retry up to `max_retries` times. Plan-limit
    /// failures are final.
    pub async fn run<A, AF, R, RF>(
        &self,
        max_retries: Option<u32>,
        skip_auth: bool,
        mut attempt: A,
        refresh: R,
    ) -> RetryReport
    where
        A: FnMut() -> AF,
        AF: Future<Output = AttemptOutcome>,
        R: FnOnce() -> RF,
        RF: Future<Output = bool>,
    {
        let max_retries = max_retries.unwrap_or(self.max_retries);
        let mut refresh = Some(refresh);
        let mut attempts = 0u32;
        let mut retry_count = 0u32;
        let mut refreshed = false;
        let mut state = RetryState::Idle;

        loop {
            state = transition(state, RetryState::Attempting);
            attempts += 1;

            let outcome = attempt().await;
            let status_code = outcome.status();
            let result = match outcome {
                AttemptOutcome::Response { status, body } => decode_envelope(status, &body),
                AttemptOutcome::Transport(error) => Err(error),
            };

            let error = match result {
                Ok(success) => {
                    transition(state, RetryState::Success);
                    return RetryReport {
                        result: Ok(success),
                        attempts,
                        retry_count,
                        status_code,
                        refreshed,
                    };
                }
                Err(error) => error,
            };

            if status_code == Some(401) && !skip_auth && attempts == 1 {
                if let Some(refresh) = refresh.take() {
                    debug!("Unauthorized on first attempt, forcing token refresh");
                    if refresh().await {
                        refreshed = true;
                        continue;
                    }
                    warn!("Forced token refresh failed");
                }
            }

            let may_retry = error.retryable && !error.is_plan_limit() && retry_count < max_retries;
            if !may_retry {
                transition(state, RetryState::Failed);
                debug!(
                    code = %error.code,
                    attempts,
                    retry_count,
                    "Request failed"
                );
                return RetryReport {
                    result: Err(error),
                    attempts,
                    retry_count,
                    status_code,
                    refreshed,
                };
            }

            let delay = self.backoff.delay(retry_count);
            retry_count += 1;
            state = transition(state, RetryState::RetryScheduled);
            debug!(
                code = %error.code,
                retry = retry_count,
                max_retries,
                delay_ms = delay.as_millis() as u64,
                "Retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

fn transition(from: RetryState, to: RetryState) -> RetryState {
    debug!(from = from.as_str(), to = to.as_str(), "Retry state");
    to
}
