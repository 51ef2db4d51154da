//! Retry utilities for transient classifier failures.
//!
//! Provides classification of retryable errors and exponential backoff.

use crate::error::PipelineError;
use std::time::Duration;

/// Determine whether a pipeline error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx), and
/// transport failures that never produced a status.
/// Non-retryable: auth failures, bad requests, malformed replies.
pub fn is_retryable(error: &PipelineError) -> bool {
    match error {
        PipelineError::Timeout { .. } => true,
        PipelineError::Network { status_code, .. } => match status_code {
            Some(code) => *code == 429 || (500..=599).contains(code),
            // Connection refused, DNS failure, reset mid-body
            None => true,
        },
        _ => false,
    }
}

/// Calculate exponential backoff duration for a given attempt.
///
/// Uses `base_delay * 2^attempt` with a cap at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResponseLayer;

    fn network(status_code: Option<u16>) -> PipelineError {
        PipelineError::Network {
            message: "request failed".to_string(),
            status_code,
        }
    }

    #[test]
    fn test_timeout_is_retryable() {
        let err = PipelineError::Timeout {
            stage: "classify".to_string(),
            timeout_ms: 60000,
        };
        assert!(is_retryable(&err));
    }

    #[test]
    fn test_rate_limit_is_retryable() {
        assert!(is_retryable(&network(Some(429))));
    }

    #[test]
    fn test_server_error_is_retryable() {
        assert!(is_retryable(&network(Some(503))));
    }

    #[test]
    fn test_client_error_not_retryable() {
        assert!(!is_retryable(&network(Some(400))));
    }

    #[test]
    fn test_connection_error_retryable_without_status() {
        assert!(is_retryable(&network(None)));
    }

    #[test]
    fn test_auth_error_not_retryable() {
        let err = PipelineError::Authentication {
            message: "invalid api key".to_string(),
            status_code: 401,
        };
        assert!(!is_retryable(&err));
    }

    #[test]
    fn test_malformed_reply_not_retryable() {
        let err = PipelineError::MalformedResponse {
            layer: ResponseLayer::Payload,
            message: "expected value".to_string(),
        };
        assert!(!is_retryable(&err));
    }

    #[test]
    fn test_decode_error_not_retryable() {
        let err = PipelineError::Decode {
            message: "invalid header".to_string(),
        };
        assert!(!is_retryable(&err));
    }

    #[test]
    fn test_backoff_exponential() {
        assert_eq!(backoff_duration(0, 1000), Duration::from_millis(1000));
        assert_eq!(backoff_duration(1, 1000), Duration::from_millis(2000));
        assert_eq!(backoff_duration(2, 1000), Duration::from_millis(4000));
        assert_eq!(backoff_duration(3, 1000), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_capped_at_30s() {
        assert_eq!(backoff_duration(10, 1000), Duration::from_millis(30_000));
    }
}
