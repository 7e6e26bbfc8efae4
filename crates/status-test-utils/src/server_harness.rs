//! Test server harness for E2E testing
//!
//! Provides `TestStatusServer` for spawning real checkStatus gRPC servers
//! on loopback in tests.

use crate::handlers::{CountingCheckStatus, HandlerCalls};
use proto_gen::{CheckStatus, CheckStatusClient};
use status_service::config::Config;
use status_service::grpc::StatusGrpcService;
use status_service::server;
use status_service::status::{LocalStatusSource, StatusSource};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tonic::metadata::AsciiMetadataValue;
use tonic::transport::Channel;

/// Host reported by the harness in `getStatusA` replies.
pub const TEST_ADVERTISED_HOST: &str = "127.0.0.1";

/// Wrap `message` in a request carrying `authorization: Bearer <token>`.
pub fn with_bearer<T>(message: T, token: &str) -> tonic::Request<T> {
    with_authorization(message, &format!("Bearer {token}"))
}

/// Wrap `message` in a request carrying the raw `authorization` value.
pub fn with_authorization<T>(message: T, value: &str) -> tonic::Request<T> {
    let mut request = tonic::Request::new(message);
    let value: AsciiMetadataValue = value.parse().expect("valid metadata value");
    request.metadata_mut().insert("authorization", value);
    request
}

/// Test harness for spawning the checkStatus gRPC server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// let (server, calls) = TestStatusServer::spawn_counting().await?;
/// // ... make calls ...
/// assert_eq!(calls.total(), 0);
/// ```
pub struct TestStatusServer {
    addr: SocketAddr,
    config: Config,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TestStatusServer {
    /// Spawn a server backed by a [`LocalStatusSource`].
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_source(Arc::new(LocalStatusSource::new(TEST_ADVERTISED_HOST))).await
    }

    /// Spawn a server backed by `source`.
    pub async fn spawn_with_source(source: Arc<dyn StatusSource>) -> Result<Self, anyhow::Error> {
        Self::spawn_service(StatusGrpcService::new(source)).await
    }

    /// Spawn a default server whose handlers record every call they receive.
    pub async fn spawn_counting() -> Result<(Self, Arc<HandlerCalls>), anyhow::Error> {
        let calls = Arc::new(HandlerCalls::default());
        let handlers = CountingCheckStatus::new(
            StatusGrpcService::new(Arc::new(LocalStatusSource::new(TEST_ADVERTISED_HOST))),
            Arc::clone(&calls),
        );
        Ok((Self::spawn_service(handlers).await?, calls))
    }

    /// Spawn a server dispatching to `handlers`.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Serve in the background until [`shutdown`](Self::shutdown) or drop
    pub async fn spawn_service<S: CheckStatus>(handlers: S) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            (
                "STATUS_GRPC_BIND_ADDRESS".to_string(),
                "127.0.0.1:0".to_string(),
            ),
            (
                "STATUS_HEALTH_BIND_ADDRESS".to_string(),
                "127.0.0.1:0".to_string(),
            ),
            (
                "STATUS_ADVERTISED_HOST".to_string(),
                TEST_ADVERTISED_HOST.to_string(),
            ),
            ("STATUS_INSTANCE_ID".to_string(), "status-test".to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let listener = server::bind(&config.grpc_bind_address)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let shutdown = CancellationToken::new();
        let server_token = shutdown.clone();
        let server_config = config.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = server::serve(listener, handlers, &server_config, server_token).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            shutdown,
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Connect a generated client to this server.
    pub async fn client(&self) -> Result<CheckStatusClient<Channel>, anyhow::Error> {
        Ok(CheckStatusClient::connect(self.url()).await?)
    }

    /// Connect a raw channel to this server.
    pub async fn channel(&self) -> Result<Channel, anyhow::Error> {
        Ok(Channel::from_shared(self.url())?.connect().await?)
    }

    /// Request shutdown and wait for the server task to finish.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestStatusServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
