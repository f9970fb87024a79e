//! Custom test assertions

use secure_api_client::{ApiError, ApiResult, ErrorCode};

/// Assertions for request outcomes
pub trait ApiResultAssertions {
    /// Assert the request failed with `code` and return the error
    fn assert_error_code(self, code: ErrorCode) -> ApiError;
}

impl<T: std::fmt::Debug> ApiResultAssertions for ApiResult<T> {
    fn assert_error_code(self, code: ErrorCode) -> ApiError {
        match self {
            Ok(success) => panic!("Expected {} error, got success: {:?}", code, success),
            Err(error) => {
                assert_eq!(
                    error.code, code,
                    "Expected {} error, got {}: {}",
                    code, error.code, error.message
                );
                error
            }
        }
    }
}

/// Assert two values are approximately equal (for floats)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_approx_eq!($left, $right, 1e-6_f64)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left_val: f64 = $left as f64;
        let right_val: f64 = $right as f64;
        let diff = (left_val - right_val).abs();
        assert!(
            diff < $epsilon,
            "assertion failed: `(left ~ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` (epsilon: `{:?}`)",
            left_val,
            right_val,
            diff,
            $epsilon
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_macro() {
        assert_approx_eq!(1.0, 1.0000001);
        assert_approx_eq!(0.1 + 0.2, 0.3, 1e-10_f64);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_approx_eq_failure() {
        assert_approx_eq!(1.0, 2.0);
    }

    #[test]
    fn test_assert_error_code() {
        let result: ApiResult<()> = Err(ApiError::timeout("slow"));
        let error = result.assert_error_code(ErrorCode::RequestTimeout);
        assert!(error.retryable);
    }
}
