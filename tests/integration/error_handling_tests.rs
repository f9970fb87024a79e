//! Error classification integration tests
//!
//! Request failures flow from the HTTP boundary into `AppError` with a
//! severity and recovery actions.

#[cfg(test)]
mod tests {
    use secure_api_client::core::types::{BackendError, decode_envelope};
    use secure_api_client::utils::error::ClientError;
    use secure_api_client::{
        ApiError, AppError, ErrorCode, ErrorDetails, RecoveryAction, Severity,
    };
    use serde_json::json;

    fn backend(value: serde_json::Value) -> Option<BackendError> {
        BackendError::from_value(&value)
    }

    // ==================== Status mapping ====================

    #[test]
    fn test_status_codes_map_to_stable_codes() {
        let cases = [
            (400, ErrorCode::BadRequest),
            (401, ErrorCode::Unauthorized),
            (403, ErrorCode::Forbidden),
            (404, ErrorCode::NotFound),
            (408, ErrorCode::RequestTimeout),
            (422, ErrorCode::ValidationError),
            (429, ErrorCode::RateLimited),
            (500, ErrorCode::ServerError),
            (503, ErrorCode::ServiceUnavailable),
            (418, ErrorCode::UnknownError),
        ];
        for (status, code) in cases {
            assert_eq!(ApiError::from_status(status, None).code, code, "status {}", status);
        }
    }

    #[test]
    fn test_nested_plan_limit_details() {
        let body = json!({
            "success": false,
            "error": {
                "code": "FORBIDDEN",
                "message": "Limit reached",
                "details": {
                    "error": { "code": "BUDGET_LIMIT_EXCEEDED", "limit": 3, "current": 3 },
                    "plan": "basic"
                }
            }
        });
        let error = decode_envelope(403, body.to_string().as_bytes()).unwrap_err();

        assert_eq!(error.code, ErrorCode::PlanLimitExceeded("BUDGET_LIMIT_EXCEEDED".into()));
        assert!(!error.retryable);
        let limit = error.details.plan_limit().unwrap();
        assert_eq!(limit.current, Some(3));
        assert_eq!(limit.plan.as_deref(), Some("basic"));
    }

    #[test]
    fn test_field_details_decoded() {
        let error = ApiError::from_status(
            422,
            backend(json!({
                "code": "VALIDATION_ERROR",
                "message": "Invalid",
                "details": { "amount": ["must be positive"] }
            })),
        );
        match error.details {
            ErrorDetails::Fields(fields) => {
                assert_eq!(fields["amount"], vec!["must be positive".to_string()])
            }
            other => panic!("unexpected details: {:?}", other),
        }
    }

    // ==================== Classification ====================

    #[test]
    fn test_classification_and_actions() {
        let unreachable = AppError::from_api_error(&ApiError::unreachable("down"));
        assert_eq!(unreachable.severity, Severity::High);
        assert_eq!(unreachable.recovery_actions(), vec![RecoveryAction::Reload]);

        let not_found = AppError::from_api_error(&ApiError::from_status(404, None));
        assert!(!not_found.retryable);
        assert_eq!(not_found.recovery_actions(), vec![RecoveryAction::GoBack]);

        let config = AppError::from_client_error(&ClientError::config("bad"));
        assert_eq!(config.severity, Severity::Critical);
        assert!(config
            .recovery_actions()
            .contains(&RecoveryAction::ContactSupport));
    }

    #[test]
    fn test_app_error_serializes_for_logging() {
        let app_error = AppError::from_api_error(&ApiError::timeout("slow"));
        let value = serde_json::to_value(&app_error).unwrap();
        assert_eq!(value["code"], "REQUEST_TIMEOUT");
        assert_eq!(value["severity"], "medium");
        assert_eq!(value["retryable"], true);
    }
}
