//! gRPC server assembly.
//!
//! [`serve`] wires the credential-check layer, the route table and the
//! handlers onto an already-bound listener. Binding is left to the caller so
//! startup fails fast on bind errors and tests can use port 0.

use crate::config::Config;
use crate::errors::StatusServiceError;
use crate::grpc::CheckStatusLayer;
use proto_gen::{CheckStatus, CheckStatusServer};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use tracing::{error, info};

/// Bind a TCP listener for the gRPC server.
pub async fn bind(address: &str) -> Result<TcpListener, StatusServiceError> {
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| StatusServiceError::Config(format!("Invalid bind address '{address}': {e}")))?;

    TcpListener::bind(addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "Failed to bind gRPC listener");
        StatusServiceError::Transport(format!("Failed to bind {addr}: {e}"))
    })
}

/// Serve `handlers` as `pb.checkStatus` on `listener` behind the
/// credential-check layer until `shutdown` is cancelled.
///
/// Calls already executing when shutdown is requested are allowed to
/// complete; new connections are refused.
pub async fn serve<S: CheckStatus>(
    listener: TcpListener,
    handlers: S,
    config: &Config,
    shutdown: CancellationToken,
) -> Result<(), StatusServiceError> {
    let local_addr = listener
        .local_addr()
        .map_err(|e| StatusServiceError::Transport(e.to_string()))?;

    info!(
        addr = %local_addr,
        service = %proto_gen::SERVICE_NAME,
        instance_id = %config.instance_id,
        max_concurrent_streams = ?config.max_concurrent_streams,
        "gRPC server starting"
    );

    Server::builder()
        .max_concurrent_streams(config.max_concurrent_streams)
        .layer(CheckStatusLayer::new())
        .add_service(CheckStatusServer::new(handlers))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
            shutdown.cancelled().await;
            info!("gRPC server shutting down");
        })
        .await?;

    info!(addr = %local_addr, "gRPC server stopped");
    Ok(())
}
