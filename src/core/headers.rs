//! Per-request security headers and bearer token resolution

use crate::config::models::ApiConfig;
use crate::core::session::SessionProvider;
use crate::utils::error::{ClientError, Result};
use crate::utils::generate_request_id;
use crate::utils::logging::mask_token;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use parking_lot::RwLock;
use rand::Rng;
use rand::distributions::Alphanumeric;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::{debug, warn};

pub const X_REQUEST_ID: &str = "x-request-id";
pub const X_CLIENT_VERSION: &str = "x-client-version";
pub const X_TIMESTAMP: &str = "x-timestamp";
pub const X_CSRF_TOKEN: &str = "x-csrf-token";
pub const X_ENVIRONMENT: &str = "x-environment";

/// Builder for a reqwest `HeaderMap`
#[derive(Debug, Default)]
pub struct HeaderBuilder {
    headers: HeaderMap,
}

impl HeaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON content type and accept headers
    pub fn with_json(mut self) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        self
    }

    /// Add authorization header (Bearer token)
    pub fn with_bearer_token(self, token: &str) -> Result<Self> {
        Ok(self.with_authorization(bearer_value(token)?))
    }

    pub fn with_authorization(mut self, value: HeaderValue) -> Self {
        self.headers.insert(AUTHORIZATION, value);
        self
    }

    /// Add a header by name
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ClientError::invalid_header(format!("Invalid header name '{}': {}", name, e)))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            ClientError::invalid_header(format!("Invalid header value for '{}': {}", name, e))
        })?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

/// Produces the header set attached to every attempt.
///
/// The last token obtained from the session provider is cached and used as a
/// fallback when the provider errors or has no session.
pub struct HeaderProvider {
    session: Option<Arc<dyn SessionProvider>>,
    cached_token: RwLock<Option<String>>,
    client_version: String,
    development: bool,
}

impl std::fmt::Debug for HeaderProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderProvider")
            .field("has_session_provider", &self.session.is_some())
            .field("client_version", &self.client_version)
            .field("development", &self.development)
            .finish()
    }
}

impl HeaderProvider {
    pub fn new(config: &ApiConfig, session: Option<Arc<dyn SessionProvider>>) -> Self {
        Self {
            session,
            cached_token: RwLock::new(None),
            client_version: config.client_version.clone(),
            development: config.environment.is_development(),
        }
    }

    /// Remember a token for fallback use
    pub fn cache_token(&self, token: Option<String>) {
        *self.cached_token.write() = token;
    }

    pub fn cached_token(&self) -> Option<String> {
        self.cached_token.read().clone()
    }

    /// Resolve the bearer token. Never fails; a missing token only drops the
    /// Authorization header.
    pub async fn resolve_token(&self) -> Option<String> {
        let Some(provider) = &self.session else {
            return self.cached_token();
        };

        match provider.current_session().await {
            Ok(Some(session)) => {
                self.cache_token(Some(session.access_token.clone()));
                Some(session.access_token)
            }
            Ok(None) => {
                debug!("No active session, falling back to cached token");
                self.cached_token()
            }
            Err(e) => {
                warn!("Session lookup failed, falling back to cached token: {}", e);
                self.cached_token()
            }
        }
    }

    /// Build the full header set for one attempt
    pub async fn build_headers(&self, skip_auth: bool, extra: &[(String, String)]) -> Result<HeaderMap> {
        let mut builder = HeaderBuilder::new()
            .with_json()
            .with_header(X_REQUEST_ID, &generate_request_id())?
            .with_header(X_CLIENT_VERSION, &self.client_version)?
            .with_header(X_TIMESTAMP, &Utc::now().to_rfc3339())?
            .with_header(X_CSRF_TOKEN, &generate_csrf_token())?;

        if self.development {
            builder = builder.with_header(X_ENVIRONMENT, "development")?;
        }

        if !skip_auth {
            if let Some(token) = self.resolve_token().await {
                match bearer_value(&token) {
                    Ok(value) => {
                        debug!(token = %mask_token(&token), "Attaching bearer token");
                        builder = builder.with_authorization(value);
                    }
                    Err(e) => {
                        warn!(token = %mask_token(&token), "Dropping Authorization header: {}", e);
                    }
                }
            }
        }

        for (name, value) in extra {
            builder = builder.with_header(name, value)?;
        }

        Ok(builder.build())
    }
}

/// `Bearer <token>` as a header value
pub fn bearer_value(token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| ClientError::invalid_header(format!("Invalid bearer token: {}", e)))
}

/// Base64 of `<millis>:<random>`
pub fn generate_csrf_token() -> String {
    let random: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    STANDARD.encode(format!("{}:{}", Utc::now().timestamp_millis(), random))
}
