//! Handlers for the `pb.checkStatus` service.
//!
//! # Security
//!
//! - All RPCs run only after [`CheckStatusLayer`](super::CheckStatusLayer)
//!   has admitted the call; each handler re-checks for the admitted caller
//! - Status source failures surface as `INTERNAL` without details
//! - Tokens are never echoed back or logged

use crate::grpc::auth_layer::AuthenticatedCaller;
use crate::status::StatusSource;
use proto_gen::{CheckStatus, Empty, TestMsg};
use std::sync::Arc;
use tonic::{Request, Response, Status};
use tracing::instrument;

/// gRPC service serving status snapshots and liveness.
#[derive(Clone)]
pub struct StatusGrpcService {
    source: Arc<dyn StatusSource>,
}

impl StatusGrpcService {
    /// Create a new status service over `source`.
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        Self { source }
    }
}

/// Fetch the admitted caller from request extensions.
#[expect(
    clippy::result_large_err,
    reason = "Status is the standard gRPC error type"
)]
fn require_caller<T>(request: &Request<T>) -> Result<&AuthenticatedCaller, Status> {
    request
        .extensions()
        .get::<AuthenticatedCaller>()
        .ok_or_else(|| Status::unauthenticated("Missing authorization header"))
}

#[tonic::async_trait]
impl CheckStatus for StatusGrpcService {
    #[instrument(skip_all, name = "status.grpc.get_status")]
    async fn get_status(&self, request: Request<Empty>) -> Result<Response<TestMsg>, Status> {
        let caller = require_caller(&request)?;

        let snapshot = self.source.primary().await.map_err(|e| {
            tracing::warn!(target: "status.grpc.service", error = %e, "Primary status unavailable");
            Status::from(e)
        })?;

        tracing::debug!(
            target: "status.grpc.service",
            token_len = caller.token_len(),
            code = snapshot.code,
            "getStatus served"
        );

        Ok(Response::new(snapshot.into()))
    }

    #[instrument(skip_all, name = "status.grpc.get_status_a")]
    async fn get_status_a(&self, request: Request<Empty>) -> Result<Response<TestMsg>, Status> {
        require_caller(&request)?;

        let snapshot = self.source.secondary().await.map_err(|e| {
            tracing::warn!(target: "status.grpc.service", error = %e, "Secondary status unavailable");
            Status::from(e)
        })?;

        tracing::debug!(target: "status.grpc.service", code = snapshot.code, "getStatusA served");

        Ok(Response::new(snapshot.into()))
    }

    // Liveness only: never consults the status source.
    #[instrument(skip_all, name = "status.grpc.health")]
    async fn health(&self, request: Request<Empty>) -> Result<Response<Empty>, Status> {
        require_caller(&request)?;
        tracing::trace!(target: "status.grpc.service", "health served");
        Ok(Response::new(Empty {}))
    }
}
