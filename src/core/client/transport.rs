//! Single network attempt

use super::client::ClientInner;
use crate::core::retry::AttemptOutcome;
use crate::core::types::{ApiError, HttpMethod, RequestOptions};
use crate::utils::error::ErrorUtils;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

impl ClientInner {
    /// Send one attempt. The timeout drops the in-flight request.
    pub(super) async fn send_once(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
        options: &RequestOptions,
        timeout: Duration,
    ) -> AttemptOutcome {
        let headers = match self
            .headers
            .build_headers(options.skip_auth, &options.headers)
            .await
        {
            Ok(headers) => headers,
            Err(e) => return AttemptOutcome::Transport(ApiError::from(e)),
        };

        let mut builder = self.http.request(method.into(), url).headers(headers);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok((status, body))) => {
                if (200..300).contains(&status) {
                    debug!(status, bytes = body.len(), "Response received");
                } else {
                    debug!(
                        status,
                        category = ?ErrorUtils::categorize_status(status),
                        "Error response received"
                    );
                }
                AttemptOutcome::Response { status, body }
            }
            Ok(Err(e)) => AttemptOutcome::Transport(ErrorUtils::map_transport_error(&e)),
            Err(_) => AttemptOutcome::Transport(ApiError::timeout(format!(
                "Request timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }
}
