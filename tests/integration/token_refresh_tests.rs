//! Token refresh integration tests
//!
//! The coordinator wired into a client: background refresh of an expiring
//! session, observer notifications and single-flight forced refreshes.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::session_expiring_in;
    use crate::common::{ScriptedSessionProvider, success_body, test_config};
    use futures::future::join_all;
    use parking_lot::Mutex;
    use secure_api_client::utils::error::ClientError;
    use secure_api_client::{RefreshObserver, SecureApiClient, Session};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RefreshObserver for RecordingObserver {
        fn on_refresh_success(&self, session: &Session) {
            self.events.lock().push(format!("success:{}", session.access_token));
        }

        fn on_refresh_failure(&self, _error: &ClientError, failure_count: u32) {
            self.events.lock().push(format!("failure:{}", failure_count));
        }

        fn on_session_expired(&self) {
            self.events.lock().push("expired".to_string());
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_background_loop_refreshes_expiring_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer renewed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!(true))))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = test_config(&server);
        config.token_refresh.enabled = true;
        config.token_refresh.threshold_secs = 300;

        // inside the 5 minute threshold
        let provider = Arc::new(
            ScriptedSessionProvider::new(Some(session_expiring_in("old", 2))).then_succeed("renewed"),
        );
        let observer = Arc::new(RecordingObserver::default());
        let client = SecureApiClient::builder(config)
            .session_provider(provider.clone())
            .refresh_observer(observer.clone())
            .build()
            .unwrap();

        wait_until(|| provider.refresh_calls() == 1).await;
        wait_until(|| !observer.events.lock().is_empty()).await;
        assert_eq!(*observer.events.lock(), vec!["success:renewed".to_string()]);

        let response = client.get::<bool>("/accounts").await.unwrap();
        assert!(response.data);
        assert_eq!(
            client.header_provider().cached_token().as_deref(),
            Some("renewed")
        );

        let coordinator = client.token_refresh().unwrap();
        assert_eq!(coordinator.stats().background_refreshes, 1);
        client.shutdown().await;
        assert!(!coordinator.is_running());
    }

    #[tokio::test]
    async fn test_concurrent_unauthorized_requests_share_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!("ok"))))
            .mount(&server)
            .await;

        let provider = Arc::new(
            ScriptedSessionProvider::with_token("stale")
                .with_delay(Duration::from_millis(100))
                .then_succeed("fresh"),
        );
        let client = SecureApiClient::builder(test_config(&server))
            .session_provider(provider.clone())
            .build()
            .unwrap();

        let endpoints = ["/accounts", "/budgets", "/goals"];
        let results = join_all(endpoints.iter().map(|e| client.get::<Value>(e))).await;

        for result in results {
            assert_eq!(result.unwrap().data, json!("ok"));
        }
        assert_eq!(provider.refresh_calls(), 1);
        let stats = client.token_refresh().unwrap().stats();
        assert_eq!(stats.forced_refreshes, 1);
        assert_eq!(stats.joined_refreshes, 2);
    }

    #[tokio::test]
    async fn test_exhausted_refresh_budget_expires_session() {
        let server = MockServer::start().await;
        let mut config = test_config(&server);
        config.token_refresh.max_retries = 2;

        let provider = Arc::new(
            ScriptedSessionProvider::with_token("t")
                .then_fail("boom")
                .then_fail("boom"),
        );
        let observer = Arc::new(RecordingObserver::default());
        let client = SecureApiClient::builder(config)
            .session_provider(provider.clone())
            .refresh_observer(observer.clone())
            .build()
            .unwrap();
        let coordinator = client.token_refresh().unwrap();

        assert!(matches!(
            coordinator.refresh_token().await,
            Err(ClientError::TokenRefresh(_))
        ));
        assert!(matches!(
            coordinator.refresh_token().await,
            Err(ClientError::RefreshBackoff(_))
        ));

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(coordinator.refresh_token().await.is_err());
        assert!(matches!(
            coordinator.refresh_token().await,
            Err(ClientError::SessionExpired)
        ));

        assert_eq!(provider.refresh_calls(), 2);
        let events = observer.events.lock().clone();
        assert_eq!(&events[..3], &["failure:1", "failure:2", "expired"]);
        assert_eq!(coordinator.snapshot().failure_count, 2);
    }
}
