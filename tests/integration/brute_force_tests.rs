//! Brute force protection integration tests

#[cfg(test)]
mod tests {
    use crate::common::test_config;
    use secure_api_client::{BlockReason, BruteForceGuard, SecureApiClient};
    use std::time::Duration;
    use wiremock::MockServer;

    #[tokio::test(start_paused = true)]
    async fn test_login_lockout_sequence() {
        let guard = BruteForceGuard::new(5, Duration::from_secs(900), Duration::from_secs(60));

        let remaining: Vec<u32> = (0..5)
            .map(|_| {
                let check = guard.check("login");
                assert!(check.allowed);
                check.remaining_attempts
            })
            .collect();
        assert_eq!(remaining, vec![4, 3, 2, 1, 0]);

        let sixth = guard.check("login");
        assert!(!sixth.allowed);
        assert_eq!(sixth.reason, Some(BlockReason::MaxAttemptsExceeded));

        tokio::time::advance(Duration::from_secs(30)).await;
        let seventh = guard.check("login");
        assert_eq!(seventh.reason, Some(BlockReason::TemporarilyBlocked));
        assert!(seventh.retry_after.unwrap() <= Duration::from_secs(30));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(guard.check("login").allowed);
        assert_eq!(guard.blocked_attempts(), 2);
    }

    #[tokio::test]
    async fn test_client_guard_uses_security_config() {
        let server = MockServer::start().await;
        let mut config = test_config(&server);
        config.security.max_login_attempts = 2;
        let client = SecureApiClient::new(config).unwrap();

        let guard = client.brute_force();
        assert!(guard.check("user@example.com").allowed);
        assert!(guard.check("user@example.com").allowed);
        assert!(!guard.check("user@example.com").allowed);

        // keys are independent
        assert!(guard.check("other@example.com").allowed);

        guard.record_success("user@example.com");
        assert!(guard.check("user@example.com").allowed);
    }
}
