//! Request error definitions.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors surfaced by the request façade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure (refused, reset, DNS).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The per-call deadline elapsed.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-2xx response. The body is preserved for the caller to
    /// interpret (validation messages, not-found, etc.).
    #[error("request failed with status {status}")]
    Status { status: StatusCode, body: String },

    /// Token refresh failed; the session is over.
    #[error("session expired: {0}")]
    SessionExpired(String),

    /// The caller aborted the request via its cancel token.
    #[error("request cancelled")]
    Cancelled,

    /// The request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Client construction was given a bad configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Whether this failure qualifies for one failover retry.
    ///
    /// Transport errors, timeouts, and the gateway statuses qualify;
    /// everything else (including other 5xx) propagates untouched.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => true,
            ApiError::Status { status, .. } => matches!(
                *status,
                StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ),
            _ => false,
        }
    }

    /// HTTP status of this error, when it has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: StatusCode) -> ApiError {
        ApiError::Status {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(status_error(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(status_error(StatusCode::SERVICE_UNAVAILABLE).is_retryable());
        assert!(status_error(StatusCode::GATEWAY_TIMEOUT).is_retryable());
        assert!(ApiError::Timeout(Duration::from_secs(30)).is_retryable());

        assert!(!status_error(StatusCode::NOT_FOUND).is_retryable());
        assert!(!status_error(StatusCode::UNPROCESSABLE_ENTITY).is_retryable());
        assert!(!status_error(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(!ApiError::Cancelled.is_retryable());
        assert!(!ApiError::SessionExpired("gone".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "request timed out after 30s");

        let err = status_error(StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("503"));
    }
}
