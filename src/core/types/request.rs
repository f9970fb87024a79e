//! Request-side types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// HTTP verbs supported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(format!("Unsupported HTTP method: {}", other)),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Traffic class selecting which rate-limit quota applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficClass {
    Api,
    Auth,
    Upload,
}

impl TrafficClass {
    /// Derive the class from the endpoint path
    pub fn for_endpoint(endpoint: &str) -> Self {
        let path = endpoint.trim_start_matches('/');
        if path.starts_with("auth/") || path == "auth" {
            TrafficClass::Auth
        } else if path.starts_with("upload") || path.contains("/upload") {
            TrafficClass::Upload
        } else {
            TrafficClass::Api
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficClass::Api => "api",
            TrafficClass::Auth => "auth",
            TrafficClass::Upload => "upload",
        }
    }
}

/// Per-request options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Omit the Authorization header and skip the 401 refresh path
    pub skip_auth: bool,
    /// Bypass the rate-limit gate
    pub skip_rate_limit: bool,
    /// Rate-limit key; defaults to the endpoint
    pub rate_limit_key: Option<String>,
    /// Rate-limit quota; defaults to [`TrafficClass::for_endpoint`]
    pub traffic_class: Option<TrafficClass>,
    /// Per-attempt timeout override
    pub timeout: Option<Duration>,
    /// Retry budget override
    pub max_retries: Option<u32>,
    /// Share in-flight identical requests
    pub deduplicate: bool,
    /// Extra headers appended after the security headers
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            skip_auth: false,
            skip_rate_limit: false,
            rate_limit_key: None,
            traffic_class: None,
            timeout: None,
            max_retries: None,
            deduplicate: true,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    pub fn skip_rate_limit(mut self) -> Self {
        self.skip_rate_limit = true;
        self
    }

    pub fn rate_limit_key(mut self, key: impl Into<String>) -> Self {
        self.rate_limit_key = Some(key.into());
        self
    }

    pub fn traffic_class(mut self, class: TrafficClass) -> Self {
        self.traffic_class = Some(class);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn no_dedup(mut self) -> Self {
        self.deduplicate = false;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
