//! Test fixtures and data factories

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use secure_api_client::utils::error::{ClientError, Result};
use secure_api_client::{Session, SessionProvider};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// `{ success: true, data }`
pub fn success_body(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// `{ success: false, error: { code, message } }`
pub fn error_body(code: &str, message: &str) -> Value {
    json!({ "success": false, "error": { "code": code, "message": message } })
}

/// Session valid for `minutes` from now
pub fn session_expiring_in(token: &str, minutes: i64) -> Session {
    Session::new(token, Utc::now() + Duration::minutes(minutes))
}

/// Session provider whose refresh outcomes are scripted up front.
///
/// Each `refresh_session` call pops the next outcome; an exhausted script
/// fails. The current session becomes whatever the last success returned.
pub struct ScriptedSessionProvider {
    current: Mutex<Option<Session>>,
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    refresh_calls: AtomicUsize,
    delay: std::time::Duration,
}

impl ScriptedSessionProvider {
    pub fn new(initial: Option<Session>) -> Self {
        Self {
            current: Mutex::new(initial),
            script: Mutex::new(VecDeque::new()),
            refresh_calls: AtomicUsize::new(0),
            delay: std::time::Duration::ZERO,
        }
    }

    pub fn with_token(token: &str) -> Self {
        Self::new(Some(session_expiring_in(token, 60)))
    }

    /// Make every refresh take `delay`
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn then_succeed(self, token: &str) -> Self {
        self.script.lock().push_back(Ok(token.to_string()));
        self
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.script.lock().push_back(Err(message.to_string()));
        self
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for ScriptedSessionProvider {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.current.lock().clone())
    }

    async fn refresh_session(&self) -> Result<Session> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.script.lock().pop_front();
        match next {
            Some(Ok(token)) => {
                let session = session_expiring_in(&token, 60);
                *self.current.lock() = Some(session.clone());
                Ok(session)
            }
            Some(Err(message)) => Err(ClientError::token_refresh(message)),
            None => Err(ClientError::token_refresh("no scripted refresh left")),
        }
    }
}
