//! Event-stream connections

use super::client::{ClientInner, SecureApiClient};
use crate::core::sse::{
    EventSourceHandle, ReadyState, SharedState, SseHandlers, SseOptions, SseParser,
};
use crate::core::types::ApiError;
use crate::utils::error::{ClientError, ErrorUtils};
use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, HeaderValue};
use std::sync::Arc;
use tracing::{debug, info, warn};

impl SecureApiClient {
    /// Open a `text/event-stream` connection to `endpoint`.
    ///
    /// The connection carries the same headers and cookies as regular
    /// requests. Callbacks run on a background task; the returned handle
    /// closes the stream on [`EventSourceHandle::close`] or drop.
    ///
    /// Must be called from within a Tokio runtime. Outside one, `on_error`
    /// fires immediately and the returned handle is already closed.
    pub fn event_source(
        &self,
        endpoint: &str,
        handlers: SseHandlers,
        options: SseOptions,
    ) -> EventSourceHandle {
        let state = SharedState::new();
        let url = self.inner.config.api.endpoint_url(endpoint);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(%url, "No Tokio runtime, event source not opened");
            state.set(ReadyState::Closed);
            handlers.error(&ApiError::from(ClientError::internal(
                "Event source requires a Tokio runtime",
            )));
            return EventSourceHandle::new(state, None);
        };

        let inner = Arc::clone(&self.inner);
        let task_state = state.clone();

        info!(%url, "Opening event source");
        let task = runtime.spawn(async move {
            inner.run_event_source(&url, &handlers, &options, &task_state).await;
            task_state.set(ReadyState::Closed);
            debug!(%url, "Event source closed");
        });

        EventSourceHandle::new(state, Some(task))
    }
}

impl ClientInner {
    async fn run_event_source(
        &self,
        url: &str,
        handlers: &SseHandlers,
        options: &SseOptions,
        state: &SharedState,
    ) {
        let mut headers = match self.headers.build_headers(options.skip_auth, &[]).await {
            Ok(headers) => headers,
            Err(e) => {
                handlers.error(&ApiError::from(e));
                return;
            }
        };
        headers.remove(CONTENT_TYPE);
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let connect = self.http.get(url).headers(headers).send();
        let response = match options.connect_timeout {
            Some(limit) => match tokio::time::timeout(limit, connect).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(url, "Event source still connecting after {:?}, closing", limit);
                    handlers.error(&ApiError::timeout(format!(
                        "Event source connection timed out after {}ms",
                        limit.as_millis()
                    )));
                    return;
                }
            },
            None => connect.await,
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                handlers.error(&ErrorUtils::map_transport_error(&e));
                return;
            }
        };

        let status = response.status().as_u16();
        if !response.status().is_success() {
            handlers.error(&ApiError::from_status(status, None));
            return;
        }

        if !state.open() {
            return;
        }
        handlers.open();

        let mut parser = SseParser::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => {
                    for event in parser.feed(&bytes) {
                        handlers.message(event);
                    }
                }
                Err(e) => {
                    handlers.error(&ErrorUtils::map_transport_error(&e));
                    return;
                }
            }
        }

        if let Some(event) = parser.finish() {
            handlers.message(event);
        }
    }
}
