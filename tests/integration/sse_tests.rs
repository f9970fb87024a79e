//! Event stream integration tests

#[cfg(test)]
mod tests {
    use crate::common::{ScriptedSessionProvider, test_config};
    use parking_lot::Mutex;
    use secure_api_client::{ReadyState, SecureApiClient, SseEvent, SseHandlers, SseOptions};
    use serde::Deserialize;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct SyncProgress {
        account: String,
        percent: u8,
    }

    #[tokio::test]
    async fn test_authenticated_stream_of_json_events() {
        let server = MockServer::start().await;
        let body = concat!(
            ": connected\n\n",
            "event: progress\nid: 1\ndata: {\"account\":\"acc_1\",\"percent\":50}\n\n",
            "event: progress\nid: 2\ndata: {\"account\":\"acc_1\",\"percent\":100}\n\n",
        );
        Mock::given(method("GET"))
            .and(path("/api/v1/sync/events"))
            .and(header("authorization", "Bearer token"))
            .and(header("accept", "text/event-stream"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SecureApiClient::builder(test_config(&server))
            .session_provider(Arc::new(ScriptedSessionProvider::with_token("token")))
            .build()
            .unwrap();

        let events: Arc<Mutex<Vec<SseEvent>>> = Arc::default();
        let handlers = {
            let events = events.clone();
            SseHandlers::new().on_message(move |event| events.lock().push(event))
        };
        let source = client.event_source("/sync/events", handlers, SseOptions::new());
        source.closed().await;

        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].id.as_deref(), Some("2"));
        let progress: SyncProgress = events[1].json().unwrap();
        assert_eq!(
            progress,
            SyncProgress {
                account: "acc_1".to_string(),
                percent: 100
            }
        );
        assert_eq!(source.ready_state(), ReadyState::Closed);
    }
}
