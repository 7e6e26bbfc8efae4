//! Protocol Buffer types and gRPC stubs for the `pb.checkStatus` service.
//!
//! This crate contains only the message definitions and the generated
//! tonic client/server stubs. It does not contain any business logic.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)] // Generated code has various doc formatting

// Re-export prost traits for convenience
pub use prost::Message;

/// Generated `pb` package.
///
/// The service is named `checkStatus` on the wire, so the generated Rust
/// identifiers keep that casing. Use the re-exports below instead.
#[allow(non_camel_case_types, non_snake_case, clippy::all, clippy::pedantic)]
pub mod pb {
    include!("messages.rs");
    include!(concat!(env!("OUT_DIR"), "/pb.checkStatus.rs"));
}

pub use pb::check_status_client::checkStatusClient as CheckStatusClient;
pub use pb::check_status_server::{
    checkStatus as CheckStatus, checkStatusServer as CheckStatusServer,
};
pub use pb::{Empty, TestMsg};

/// Fully-qualified gRPC service name.
pub const SERVICE_NAME: &str = "pb.checkStatus";

/// Method names (`service/Method`) registered by the `pb.checkStatus` service.
pub mod methods {
    /// `getStatus(Empty) -> TestMsg`
    pub const GET_STATUS: &str = "pb.checkStatus/getStatus";
    /// `getStatusA(Empty) -> TestMsg`
    pub const GET_STATUS_A: &str = "pb.checkStatus/getStatusA";
    /// `health(Empty) -> Empty`
    pub const HEALTH: &str = "pb.checkStatus/health";

    /// Every registered method. Anything else is answered with `NOT_FOUND`.
    pub const ALL: [&str; 3] = [GET_STATUS, GET_STATUS_A, HEALTH];

    /// Returns true if `path` (an HTTP/2 `:path`, e.g. `/pb.checkStatus/health`)
    /// names a registered method.
    pub fn is_registered_path(path: &str) -> bool {
        path.strip_prefix('/')
            .is_some_and(|method| ALL.contains(&method))
    }
}
