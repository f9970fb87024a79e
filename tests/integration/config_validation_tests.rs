//! Configuration loading and validation integration tests

#[cfg(test)]
mod tests {
    use secure_api_client::config::{Config, Validate};
    use secure_api_client::{SecureApiClient, TrafficClass};
    use std::io::Write;
    use tempfile::NamedTempFile;

    // ==================== File loading ====================

    #[tokio::test]
    async fn test_load_partial_yaml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "api:\n  base_url: https://api.example.com\n  api_version: v2\nrate_limit:\n  auth_requests: 3\nlogging:\n  level: debug"
        )
        .unwrap();

        let config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.api.api_url(), "https://api.example.com/api/v2");
        assert_eq!(config.rate_limit.limit_for(TrafficClass::Auth), 3);
        assert_eq!(
            config.rate_limit.limit_for(TrafficClass::Api),
            Config::default().rate_limit.api_requests
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[tokio::test]
    async fn test_invalid_file_halts_startup() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: not a url").unwrap();
        assert!(Config::from_file(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(dir.path().join("absent.yaml")).await.is_err());
    }

    #[test]
    fn test_yaml_roundtrip_preserves_config() {
        let mut config = Config::default();
        config.security.max_login_attempts = 7;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
    }

    // ==================== Validation rules ====================

    #[test]
    fn test_section_rules() {
        let mut config = Config::default();
        config.api.api_version = String::new();
        assert!(config.api.validate().is_err());

        let mut config = Config::default();
        config.rate_limit.window_secs = 0;
        assert!(config.rate_limit.validate().is_err());

        let mut config = Config::default();
        config.token_refresh.threshold_secs = 86_400;
        assert!(config.token_refresh.validate().is_err());

        let mut config = Config::default();
        config.security.max_login_attempts = 0;
        assert!(config.security.validate().is_err());

        let mut config = Config::default();
        config.api.timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_refuses_invalid_config() {
        let mut config = Config::default();
        config.rate_limit.upload_requests = 0;
        let error = SecureApiClient::new(config).unwrap_err();
        assert!(error.to_string().contains("Rate limit"));
    }
}
