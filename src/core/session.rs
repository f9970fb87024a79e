//! Session model and the provider seam used for token resolution and refresh

use crate::utils::error::{ClientError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

impl Session {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
        }
    }

    /// Build a session from a JWT, reading its `exp` claim.
    ///
    /// The signature is not checked; the backend remains the authority on
    /// whether the token is valid.
    pub fn from_jwt(token: &str) -> Result<Self> {
        let header = decode_header(token)?;

        let mut validation = Validation::new(header.alg);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
        let expires_at = Utc
            .timestamp_opt(data.claims.exp, 0)
            .single()
            .ok_or_else(|| ClientError::session(format!("Invalid exp claim: {}", data.claims.exp)))?;

        Ok(Self::new(token, expires_at))
    }

    /// Time left before expiry, zero once expired
    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Expired or within `threshold` of expiry
    pub fn needs_refresh(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        match ChronoDuration::from_std(threshold) {
            Ok(threshold) => self.expires_at - now <= threshold,
            Err(_) => true,
        }
    }
}

/// Source of the current session and of refreshed ones
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The active session, if any
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Exchange the current credentials for a new session
    async fn refresh_session(&self) -> Result<Session>;
}

/// Provider holding a fixed session that callers can replace.
///
/// Refreshing returns the held session, or fails when there is none.
#[derive(Debug, Default)]
pub struct StaticSessionProvider {
    session: RwLock<Option<Session>>,
}

impl StaticSessionProvider {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }

    /// Wrap a bare token; JWTs get their real expiry, anything else a distant one
    pub fn from_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let session = Session::from_jwt(&token)
            .unwrap_or_else(|_| Session::new(token, Utc::now() + ChronoDuration::days(365)));
        Self::new(Some(session))
    }

    pub fn set_session(&self, session: Option<Session>) {
        *self.session.write() = session;
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.session.read().clone())
    }

    async fn refresh_session(&self) -> Result<Session> {
        self.session
            .read()
            .clone()
            .ok_or_else(|| ClientError::token_refresh("No session to refresh"))
    }
}
