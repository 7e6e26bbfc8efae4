//! Status service error types.
//!
//! Errors map to gRPC status codes at the dispatch boundary. Internal details
//! are logged server-side but not exposed to callers.

use thiserror::Error;
use tonic::{Code, Status};

/// Status service error type.
///
/// Maps to gRPC status codes:
/// - `StatusUnavailable`, `Internal`: `INTERNAL`
/// - `Config`, `Transport`: never returned to callers (startup only)
#[derive(Debug, Error)]
pub enum StatusServiceError {
    /// The status source could not produce a snapshot.
    #[error("Status source error: {0}")]
    StatusUnavailable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// gRPC or HTTP server failed to bind or serve.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StatusServiceError {
    /// Returns the gRPC status code for this error.
    pub fn status_code(&self) -> Code {
        match self {
            StatusServiceError::StatusUnavailable(_)
            | StatusServiceError::Config(_)
            | StatusServiceError::Transport(_)
            | StatusServiceError::Internal(_) => Code::Internal,
        }
    }

    /// Returns a caller-safe error message (no internal details).
    pub fn client_message(&self) -> String {
        "An internal error occurred".to_string()
    }
}

impl From<StatusServiceError> for Status {
    fn from(err: StatusServiceError) -> Self {
        Status::new(err.status_code(), err.client_message())
    }
}

impl From<crate::config::ConfigError> for StatusServiceError {
    fn from(err: crate::config::ConfigError) -> Self {
        StatusServiceError::Config(err.to_string())
    }
}

impl From<tonic::transport::Error> for StatusServiceError {
    fn from(err: tonic::transport::Error) -> Self {
        StatusServiceError::Transport(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            StatusServiceError::StatusUnavailable("probe failed".to_string()).status_code(),
            Code::Internal
        );
        assert_eq!(
            StatusServiceError::Internal("boom".to_string()).status_code(),
            Code::Internal
        );
    }

    #[test]
    fn test_client_messages_hide_internal_details() {
        let err = StatusServiceError::StatusUnavailable(
            "connection refused at 192.168.1.100:5432".to_string(),
        );
        let status: Status = err.into();

        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "An internal error occurred");
        assert!(!status.message().contains("192.168"));
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(
            format!("{}", StatusServiceError::StatusUnavailable("timeout".to_string())),
            "Status source error: timeout"
        );
        assert_eq!(
            format!("{}", StatusServiceError::Config("bad port".to_string())),
            "Configuration error: bad port"
        );
    }
}
