//! Configuration management for the client
//!
//! This module handles loading, validation, and management of all client
//! configuration. Invalid configuration is rejected at load time.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Main configuration struct for the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend endpoint and transport settings
    pub api: ApiConfig,
    /// Fixed-window quotas
    pub rate_limit: RateLimitConfig,
    /// Background token refresh
    pub token_refresh: TokenRefreshConfig,
    /// Brute-force protection
    pub security: SecurityConfig,
    /// Log output
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ClientError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ClientError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables (after `.env`, if any)
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment overrides from {:?}", path);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Unset variables keep their defaults; unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("API_BASE_URL") {
            config.api.base_url = url;
        }
        if let Some(version) = lookup("API_VERSION") {
            config.api.api_version = version;
        }
        if let Some(version) = lookup("CLIENT_VERSION") {
            config.api.client_version = version;
        }
        parse_var(&lookup, "API_TIMEOUT_SECS", &mut config.api.timeout)?;
        parse_var(&lookup, "API_MAX_RETRIES", &mut config.api.max_retries)?;
        parse_var(&lookup, "APP_ENV", &mut config.api.environment)?;

        parse_var(&lookup, "RATE_LIMIT_ENABLED", &mut config.rate_limit.enabled)?;
        parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS", &mut config.rate_limit.window_secs)?;
        parse_var(&lookup, "RATE_LIMIT_API_REQUESTS", &mut config.rate_limit.api_requests)?;
        parse_var(&lookup, "RATE_LIMIT_AUTH_REQUESTS", &mut config.rate_limit.auth_requests)?;
        parse_var(
            &lookup,
            "RATE_LIMIT_UPLOAD_REQUESTS",
            &mut config.rate_limit.upload_requests,
        )?;

        parse_var(
            &lookup,
            "TOKEN_REFRESH_THRESHOLD_SECS",
            &mut config.token_refresh.threshold_secs,
        )?;
        parse_var(&lookup, "TOKEN_REFRESH_ENABLED", &mut config.token_refresh.enabled)?;

        parse_var(
            &lookup,
            "MAX_LOGIN_ATTEMPTS",
            &mut config.security.max_login_attempts,
        )?;
        parse_var(
            &lookup,
            "LOGIN_ATTEMPT_WINDOW_SECS",
            &mut config.security.login_attempt_window_secs,
        )?;

        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level;
        }
        parse_var(&lookup, "LOG_JSON", &mut config.logging.json)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.api
            .validate()
            .map_err(|e| ClientError::Config(format!("API config error: {}", e)))?;
        self.rate_limit
            .validate()
            .map_err(|e| ClientError::Config(format!("Rate limit config error: {}", e)))?;
        self.token_refresh
            .validate()
            .map_err(|e| ClientError::Config(format!("Token refresh config error: {}", e)))?;
        self.security
            .validate()
            .map_err(|e| ClientError::Config(format!("Security config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| ClientError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration; sections of `other` that differ from
    /// the defaults take precedence
    pub fn merge(mut self, other: Self) -> Self {
        if other.api != ApiConfig::default() {
            self.api = other.api;
        }
        if other.rate_limit != RateLimitConfig::default() {
            self.rate_limit = other.rate_limit;
        }
        if other.token_refresh != TokenRefreshConfig::default() {
            self.token_refresh = other.token_refresh;
        }
        if other.security != SecurityConfig::default() {
            self.security = other.security;
        }
        if other.logging != LoggingConfig::default() {
            self.logging = other.logging;
        }
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| ClientError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| ClientError::Config(format!("Invalid {}: {}", key, e)))?;
    }
    Ok(())
}
