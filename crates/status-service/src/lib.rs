//! checkStatus Service Library
//!
//! Server side of the `pb.checkStatus` gRPC service:
//!
//! - Three unary RPCs: `getStatus`, `getStatusA`, `health`
//! - A single credential-check layer ahead of dispatch (Bearer tokens)
//! - Route table enforcement (`NOT_FOUND` for unregistered methods)
//! - HTTP/JSON gateway exposing the same three methods
//! - HTTP liveness/readiness endpoints
//!
//! # Call lifecycle
//!
//! ```text
//! Received -> Authenticating -+-> Authorized -> Executing -> Responded
//!                             +-> Unauthorized -> Rejected
//! ```
//!
//! # Modules
//!
//! - [`config`] - Service configuration from environment
//! - [`errors`] - Error types and their gRPC status mapping
//! - [`gateway`] - HTTP/JSON surface over the same handlers
//! - [`grpc`] - Credential-check layer and RPC handlers
//! - [`observability`] - HTTP health endpoints
//! - [`server`] - gRPC server assembly
//! - [`status`] - Status snapshots and their sources

pub mod config;
pub mod errors;
pub mod gateway;
pub mod grpc;
pub mod observability;
pub mod server;
pub mod status;
