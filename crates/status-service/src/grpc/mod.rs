//! gRPC surface of the status service.
//!
//! - [`auth_layer`] - Route table and credential check ahead of dispatch
//! - [`status_service`] - `pb.checkStatus` RPC handlers

pub mod auth_layer;
pub mod status_service;

pub use auth_layer::{AuthenticatedCaller, CheckStatusLayer};
pub use status_service::StatusGrpcService;
