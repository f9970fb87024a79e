//! Request pipeline integration tests
//!
//! Deduplication, retry with backoff, forced refresh on 401 and error
//! classification, exercised end to end against a mock backend.

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::common::assertions::ApiResultAssertions;
    use crate::common::{ScriptedSessionProvider, error_body, success_body, test_config};
    use futures::future::join_all;
    use secure_api_client::{
        AppError, ErrorCode, HttpMethod, RecoveryAction, RequestOptions, SecureApiClient,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ==================== Deduplication ====================

    #[tokio::test]
    async fn test_concurrent_identical_requests_share_one_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body(json!([{ "id": "acc_1" }])))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        let results = join_all((0..5).map(|_| client.get::<Value>("/accounts"))).await;

        assert_eq!(results.len(), 5);
        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert_eq!(result.as_ref().unwrap(), first);
        }
        assert_eq!(client.pending_requests(), 0);
        // one execution, one metrics entry
        assert_eq!(client.metrics().len(), 1);
    }

    #[tokio::test]
    async fn test_different_bodies_are_not_shared() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/transactions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body(json!({ "ok": true })))
                    .set_delay(Duration::from_millis(50)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        let a = json!({ "amount": 1 });
        let b = json!({ "amount": 2 });
        let (ra, rb) = tokio::join!(
            client.post::<_, Value>("/transactions", &a),
            client.post::<_, Value>("/transactions", &b)
        );
        assert!(ra.is_ok());
        assert!(rb.is_ok());
    }

    #[tokio::test]
    async fn test_deduplication_can_be_disabled_per_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body(json!(1)))
                    .set_delay(Duration::from_millis(50)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        let options = || RequestOptions::new().no_dedup();
        let (a, b) = tokio::join!(
            client.get_with::<Value>("/balance", options()),
            client.get_with::<Value>("/balance", options())
        );
        assert!(a.is_ok() && b.is_ok());
    }

    // ==================== Retry and backoff ====================

    #[tokio::test]
    async fn test_server_errors_retried_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(3)
            .expect(3)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!("ok"))))
            .expect(1)
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        let response = client.get::<String>("/budgets").await.unwrap();
        assert_eq!(response.data, "ok");

        let metrics = &client.metrics().recent(1)[0];
        assert_eq!(metrics.retry_count, 3);
        assert_eq!(metrics.attempts, 4);
        assert_eq!(metrics.status_code, Some(200));
        assert!(metrics.error.is_none());
    }

    #[tokio::test]
    async fn test_retries_exhausted_on_service_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(4)
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        let error = client
            .get::<Value>("/reports")
            .await
            .assert_error_code(ErrorCode::ServiceUnavailable);
        assert!(error.retryable);
        assert_eq!(error.status, Some(503));

        let app_error = AppError::from_api_error(&error);
        assert!(app_error.recovery_actions().contains(&RecoveryAction::TryAgain));
    }

    #[tokio::test]
    async fn test_rate_limited_status_exhausts_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(2)
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        client
            .get_with::<Value>("/goals", RequestOptions::new().max_retries(1))
            .await
            .assert_error_code(ErrorCode::RateLimited);
        assert_eq!(client.metrics().recent(1)[0].retry_count, 1);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(error_body("NOT_FOUND", "x")))
            .expect(1)
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        let error = client
            .get::<Value>("/accounts/missing")
            .await
            .assert_error_code(ErrorCode::NotFound);
        assert!(!error.retryable);
        assert_eq!(error.message, "x");
        assert_eq!(client.metrics().recent(1)[0].retry_count, 0);
    }

    #[tokio::test]
    async fn test_metrics_summary_over_mixed_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(success_body(json!([])))
                    .set_delay(Duration::from_millis(20)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(error_body("NOT_FOUND", "x")))
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        client.get::<Value>("/accounts").await.unwrap();
        client.get::<Value>("/accounts").await.unwrap();
        client
            .get::<Value>("/accounts/missing")
            .await
            .assert_error_code(ErrorCode::NotFound);

        let summary = client.metrics_summary();
        assert_eq!(summary.total_requests, 3);
        assert_eq!(summary.slow_requests, 0);
        assert_approx_eq!(summary.error_rate, 1.0 / 3.0);

        let recorded = client.metrics().recent(3);
        let mean_ms = recorded
            .iter()
            .map(|m| m.duration().unwrap().as_secs_f64() * 1000.0)
            .sum::<f64>()
            / 3.0;
        assert_approx_eq!(summary.average_duration_ms, mean_ms, 1e-9_f64);
        assert!(summary.average_duration_ms >= 40.0 / 3.0);
    }

    #[tokio::test]
    async fn test_plan_limit_never_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "success": false,
                "error": {
                    "code": "ACCOUNT_LIMIT_EXCEEDED",
                    "message": "Upgrade to add more accounts",
                    "details": { "limit": 2, "current": 2, "plan": "free" }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        let error = client
            .post::<_, Value>("/accounts", &json!({ "name": "Savings" }))
            .await
            .assert_error_code(ErrorCode::PlanLimitExceeded("ACCOUNT_LIMIT_EXCEEDED".into()));

        assert!(!error.retryable);
        let limit = error.details.plan_limit().unwrap();
        assert_eq!(limit.limit, Some(2));
        assert_eq!(limit.plan.as_deref(), Some("free"));

        let app_error = AppError::from_api_error(&error);
        assert!(app_error.recovery_actions().contains(&RecoveryAction::ViewPlans));
    }

    #[tokio::test]
    async fn test_backend_code_overrides_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(error_body("INVALID_CREDENTIALS", "Wrong password")),
            )
            .mount(&server)
            .await;

        let client = SecureApiClient::new(test_config(&server)).unwrap();
        client
            .post::<_, Value>("/auth/login", &json!({ "email": "a@b.c", "password": "x" }))
            .await
            .assert_error_code(ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let server = MockServer::start().await;
        let config = test_config(&server);
        drop(server);

        let client = SecureApiClient::new(config).unwrap();
        let error = client
            .get_with::<Value>("/accounts", RequestOptions::new().max_retries(0))
            .await
            .unwrap_err();
        assert!(matches!(
            error.code,
            ErrorCode::NetworkError | ErrorCode::BackendUnreachable
        ));
        assert!(error.status.is_none());
    }

    // ==================== Forced refresh on 401 ====================

    #[tokio::test]
    async fn test_unauthorized_refreshes_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!(42))))
            .expect(1)
            .mount(&server)
            .await;

        let provider = Arc::new(ScriptedSessionProvider::with_token("stale").then_succeed("fresh"));
        let client = SecureApiClient::builder(test_config(&server))
            .session_provider(provider.clone())
            .build()
            .unwrap();

        let response = client.get::<u32>("/profile").await.unwrap();
        assert_eq!(response.data, 42);
        assert_eq!(provider.refresh_calls(), 1);

        let metrics = &client.metrics().recent(1)[0];
        assert_eq!(metrics.retry_count, 0);
        assert_eq!(metrics.attempts, 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_surfaces_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let provider = Arc::new(ScriptedSessionProvider::with_token("stale").then_fail("revoked"));
        let client = SecureApiClient::builder(test_config(&server))
            .session_provider(provider.clone())
            .build()
            .unwrap();

        let error = client
            .get::<Value>("/profile")
            .await
            .assert_error_code(ErrorCode::Unauthorized);
        assert_eq!(provider.refresh_calls(), 1);
        assert_eq!(client.metrics().recent(1)[0].attempts, 1);

        let app_error = AppError::from_api_error(&error);
        assert!(app_error.recovery_actions().contains(&RecoveryAction::LogIn));
    }

    #[tokio::test]
    async fn test_skip_auth_does_not_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let provider = Arc::new(ScriptedSessionProvider::with_token("t").then_succeed("u"));
        let client = SecureApiClient::builder(test_config(&server))
            .session_provider(provider.clone())
            .build()
            .unwrap();

        client
            .request(
                HttpMethod::Post,
                "/auth/login",
                Some(json!({ "email": "a@b.c" })),
                RequestOptions::new().skip_auth(),
            )
            .await
            .assert_error_code(ErrorCode::Unauthorized);
        assert_eq!(provider.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_unencodable_token_sends_without_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!([]))))
            .expect(1)
            .mount(&server)
            .await;

        let provider = Arc::new(ScriptedSessionProvider::with_token("bad\ntoken"));
        let client = SecureApiClient::builder(test_config(&server))
            .session_provider(provider.clone())
            .build()
            .unwrap();

        let response = client.get::<Value>("/accounts").await.unwrap();
        assert_eq!(response.data, json!([]));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
        assert_eq!(provider.refresh_calls(), 0);
    }

    // ==================== Rate limiting ====================

    #[tokio::test]
    async fn test_rate_limit_blocks_before_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!(null))))
            .expect(2)
            .mount(&server)
            .await;

        let mut config = test_config(&server);
        config.rate_limit.api_requests = 2;
        let client = SecureApiClient::new(config).unwrap();

        assert!(client.get::<Value>("/accounts").await.is_ok());
        assert!(client.get::<Value>("/accounts").await.is_ok());
        client
            .get::<Value>("/accounts")
            .await
            .assert_error_code(ErrorCode::RateLimited);

        // separate key, separate window
        Mock::given(method("GET"))
            .and(path("/api/v1/budgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!(null))))
            .mount(&server)
            .await;
        assert!(client.get::<Value>("/budgets").await.is_ok());

        let summary = client.metrics_summary();
        assert_eq!(summary.total_requests, 4);
        assert_eq!(summary, client.metrics_summary());
    }

    #[tokio::test]
    async fn test_auth_endpoints_use_auth_quota() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(json!(null))))
            .mount(&server)
            .await;

        let mut config = test_config(&server);
        config.rate_limit.auth_requests = 1;
        let client = SecureApiClient::new(config).unwrap();

        let body = json!({ "email": "a@b.c" });
        assert!(client.post::<_, Value>("auth/login", &body).await.is_ok());
        client
            .post::<_, Value>("auth/login", &body)
            .await
            .assert_error_code(ErrorCode::RateLimited);
        assert!(client.post::<_, Value>("/transactions", &body).await.is_ok());
    }
}
