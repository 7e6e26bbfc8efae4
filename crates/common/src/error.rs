//! RPC error taxonomy shared by the client and the server.
//!
//! Every failure a caller can observe is one of these variants. Each maps to
//! exactly one gRPC status code and carries the details string the caller
//! sees.

use thiserror::Error;
use tonic::{Code, Status};

/// Prefix of the status message tonic produces when a protobuf payload
/// cannot be decoded.
const DECODE_FAILURE_PREFIX: &str = "failed to decode Protobuf message";

/// Errors surfaced by an RPC.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    /// Missing or malformed credential.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// The method is not registered.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The call's deadline elapsed before a response arrived.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// The endpoint could not be reached.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// A payload could not be decoded.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Unexpected fault while executing a handler.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The caller cancelled the call.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// The call could not be constructed (bad method name or metadata).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other status code signaled by the server.
    #[error("{code:?}: {details}")]
    Status { code: Code, details: String },
}

impl RpcError {
    /// Returns the gRPC status code for this error.
    pub fn code(&self) -> Code {
        match self {
            RpcError::Unauthenticated(_) => Code::Unauthenticated,
            RpcError::NotFound(_) => Code::NotFound,
            RpcError::DeadlineExceeded(_) => Code::DeadlineExceeded,
            RpcError::Unavailable(_) => Code::Unavailable,
            RpcError::InvalidPayload(_) | RpcError::Internal(_) => Code::Internal,
            RpcError::Cancelled(_) => Code::Cancelled,
            RpcError::InvalidArgument(_) => Code::InvalidArgument,
            RpcError::Status { code, .. } => *code,
        }
    }

    /// Returns the human-readable details string.
    pub fn details(&self) -> &str {
        match self {
            RpcError::Unauthenticated(details)
            | RpcError::NotFound(details)
            | RpcError::DeadlineExceeded(details)
            | RpcError::Unavailable(details)
            | RpcError::InvalidPayload(details)
            | RpcError::Internal(details)
            | RpcError::Cancelled(details)
            | RpcError::InvalidArgument(details)
            | RpcError::Status { details, .. } => details,
        }
    }

    /// True for failures produced by the transport rather than signaled by
    /// a server handler or the server's credential check.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            RpcError::DeadlineExceeded(_)
                | RpcError::Unavailable(_)
                | RpcError::InvalidPayload(_)
                | RpcError::Cancelled(_)
                | RpcError::InvalidArgument(_)
        )
    }

    /// Convert into a `tonic::Status` carrying the same code and details.
    pub fn into_status(self) -> Status {
        Status::new(self.code(), self.details())
    }
}

impl From<Status> for RpcError {
    fn from(status: Status) -> Self {
        let details = status.message().to_string();
        match status.code() {
            Code::Unauthenticated => RpcError::Unauthenticated(details),
            Code::NotFound => RpcError::NotFound(details),
            Code::DeadlineExceeded => RpcError::DeadlineExceeded(details),
            Code::Unavailable => RpcError::Unavailable(details),
            Code::Internal if details.starts_with(DECODE_FAILURE_PREFIX) => {
                RpcError::InvalidPayload(details)
            }
            Code::Internal => RpcError::Internal(details),
            Code::Cancelled => RpcError::Cancelled(details),
            Code::InvalidArgument => RpcError::InvalidArgument(details),
            code => RpcError::Status { code, details },
        }
    }
}

impl From<RpcError> for Status {
    fn from(err: RpcError) -> Self {
        err.into_status()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_to_error_mapping() {
        let cases = [
            (Status::unauthenticated("x"), Code::Unauthenticated),
            (Status::not_found("x"), Code::NotFound),
            (Status::deadline_exceeded("x"), Code::DeadlineExceeded),
            (Status::unavailable("x"), Code::Unavailable),
            (Status::internal("x"), Code::Internal),
            (Status::cancelled("x"), Code::Cancelled),
            (Status::invalid_argument("x"), Code::InvalidArgument),
            (Status::permission_denied("x"), Code::PermissionDenied),
        ];

        for (status, code) in cases {
            let err = RpcError::from(status);
            assert_eq!(err.code(), code);
            assert_eq!(err.details(), "x");
        }
    }

    #[test]
    fn test_decode_failure_maps_to_invalid_payload() {
        let status = Status::internal("failed to decode Protobuf message: invalid wire type");
        let err = RpcError::from(status);
        assert!(matches!(err, RpcError::InvalidPayload(_)));
        assert_eq!(err.code(), Code::Internal);
    }

    #[test]
    fn test_other_codes_are_passed_through() {
        let err = RpcError::from(Status::resource_exhausted("busy"));
        assert_eq!(
            err,
            RpcError::Status {
                code: Code::ResourceExhausted,
                details: "busy".to_string()
            }
        );
        assert!(!err.is_transport_failure());
    }

    #[test]
    fn test_into_status_preserves_code_and_details() {
        let status = RpcError::Unauthenticated("Missing authorization header".to_string())
            .into_status();
        assert_eq!(status.code(), Code::Unauthenticated);
        assert_eq!(status.message(), "Missing authorization header");
    }

    #[test]
    fn test_transport_failure_classification() {
        assert!(RpcError::Unavailable("down".to_string()).is_transport_failure());
        assert!(RpcError::DeadlineExceeded("slow".to_string()).is_transport_failure());
        assert!(RpcError::InvalidPayload("bad".to_string()).is_transport_failure());
        assert!(!RpcError::Unauthenticated("no".to_string()).is_transport_failure());
        assert!(!RpcError::NotFound("no".to_string()).is_transport_failure());
        assert!(!RpcError::Internal("boom".to_string()).is_transport_failure());
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(
            RpcError::Unauthenticated("Empty token".to_string()).to_string(),
            "Unauthenticated: Empty token"
        );
        assert_eq!(
            RpcError::Status {
                code: Code::Aborted,
                details: "retry".to_string()
            }
            .to_string(),
            "Aborted: retry"
        );
    }
}
