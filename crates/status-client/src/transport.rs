//! Authenticated unary RPC transport.
//!
//! [`RpcChannel`] performs one request/response exchange per
//! [`call`](RpcChannel::call), attaching the metadata carried by a
//! [`CallContext`]. It owns a single tonic `Channel`; the channel is cloned
//! per call so concurrent calls multiplex as independent HTTP/2 streams.
//!
//! # Failure mapping
//!
//! | Condition | Result |
//! |---|---|
//! | Malformed method name or metadata | `InvalidArgument` (nothing sent) |
//! | Connection refused / unreachable | `Unavailable` |
//! | Timeout elapsed | `DeadlineExceeded` (late reply dropped) |
//! | Cancellation token fired | `Cancelled` |
//! | Response fails to decode | `InvalidPayload` |
//! | Server-signaled status | matching `RpcError` variant |
//!
//! No call is ever retried.

use crate::config::ClientConfig;
use common::credential::normalize_key;
use common::error::RpcError;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue};
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::{debug, instrument, warn};

/// Per-call settings: method, metadata, timeout, cancellation.
///
/// Metadata keys are stored lowercase, so setting `Authorization` and then
/// `authorization` leaves a single entry.
#[derive(Clone)]
pub struct CallContext {
    method: String,
    timeout: Option<Duration>,
    metadata: BTreeMap<String, String>,
    cancellation: CancellationToken,
}

impl CallContext {
    /// Create a context for `method` (`package.Service/Method`).
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            timeout: None,
            metadata: BTreeMap::new(),
            cancellation: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert_metadata(key, value);
        self
    }

    /// Abandon the call when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set a metadata entry, replacing any entry with the same normalized key.
    pub fn insert_metadata(&mut self, key: &str, value: impl Into<String>) {
        self.metadata.insert(normalize_key(key), value.into());
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Validate the method name and build the HTTP/2 request path.
    pub fn path(&self) -> Result<PathAndQuery, RpcError> {
        let invalid = || RpcError::InvalidArgument(format!("invalid method name '{}'", self.method));

        let (service, method) = self.method.split_once('/').ok_or_else(invalid)?;
        let well_formed = !service.is_empty()
            && !method.is_empty()
            && service.contains('.')
            && !method.contains('/')
            && !self.method.chars().any(char::is_whitespace);
        if !well_formed {
            return Err(invalid());
        }

        PathAndQuery::try_from(format!("/{}", self.method)).map_err(|_| invalid())
    }

    /// Build the outgoing tonic request with this context's metadata.
    fn request<T>(&self, message: T, timeout: Option<Duration>) -> Result<tonic::Request<T>, RpcError> {
        let mut request = tonic::Request::new(message);

        for (key, value) in &self.metadata {
            let name = AsciiMetadataKey::from_bytes(key.as_bytes())
                .map_err(|_| RpcError::InvalidArgument(format!("invalid metadata key '{key}'")))?;
            // Values may carry credentials; never echo them
            let invalid_value =
                || RpcError::InvalidArgument(format!("invalid metadata value for '{key}'"));
            if !is_printable_ascii(value) {
                return Err(invalid_value());
            }
            let value = AsciiMetadataValue::try_from(value.as_str()).map_err(|_| invalid_value())?;
            request.metadata_mut().insert(name, value);
        }

        if let Some(timeout) = timeout {
            request.set_timeout(timeout);
        }

        Ok(request)
    }
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("method", &self.method)
            .field("timeout", &self.timeout)
            .field("metadata_keys", &self.metadata.keys().collect::<Vec<_>>())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

/// Connection to a checkStatus server.
#[derive(Clone, Debug)]
pub struct RpcChannel {
    channel: Channel,
    default_timeout: Option<Duration>,
}

impl RpcChannel {
    /// Connect eagerly, failing fast if the server is unreachable.
    #[instrument(skip_all, fields(server = %config.server_url))]
    pub async fn connect(config: &ClientConfig) -> Result<Self, RpcError> {
        let channel = endpoint(config)?.connect().await.map_err(|e| {
            warn!(
                target: "status.client.transport",
                error = %e,
                server = %config.server_url,
                "Failed to connect"
            );
            RpcError::Unavailable(format!("Failed to connect to {}: {e}", config.server_url))
        })?;

        debug!(target: "status.client.transport", server = %config.server_url, "Connected");

        Ok(Self {
            channel,
            default_timeout: config.rpc_timeout,
        })
    }

    /// Build a channel that connects on first use.
    pub fn connect_lazy(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self {
            channel: endpoint(config)?.connect_lazy(),
            default_timeout: config.rpc_timeout,
        })
    }

    /// Wrap an existing tonic channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            channel,
            default_timeout: None,
        }
    }

    /// Per-call timeout used when a [`CallContext`] sets none.
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Perform one unary exchange.
    ///
    /// The timeout (context first, then channel default) is sent to the
    /// server as `grpc-timeout` and also enforced locally.
    #[instrument(skip_all, name = "status.client.call", fields(method = %ctx.method()))]
    pub async fn call<Req, Resp>(&self, ctx: &CallContext, message: Req) -> Result<Resp, RpcError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let path = ctx.path()?;
        let timeout = ctx.timeout().or(self.default_timeout);
        let request = ctx.request(message, timeout)?;

        if ctx.cancellation().is_cancelled() {
            return Err(RpcError::Cancelled("call cancelled before start".to_string()));
        }

        let mut grpc = tonic::client::Grpc::new(self.channel.clone());
        let exchange = async move {
            grpc.ready()
                .await
                .map_err(|e| RpcError::Unavailable(format!("Service was not ready: {e}")))?;
            let codec: ProstCodec<Req, Resp> = ProstCodec::default();
            grpc.unary(request, path, codec)
                .await
                .map(tonic::Response::into_inner)
                .map_err(classify)
        };

        let bounded = async move {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, exchange).await {
                    Ok(result) => settle_timed(result),
                    Err(_) => Err(RpcError::DeadlineExceeded(format!(
                        "Deadline of {}ms elapsed",
                        limit.as_millis()
                    ))),
                },
                None => exchange.await,
            }
        };

        let result = tokio::select! {
            biased;
            () = ctx.cancellation().cancelled() => {
                Err(RpcError::Cancelled("call cancelled by caller".to_string()))
            }
            result = bounded => result,
        };

        if let Err(e) = &result {
            debug!(
                target: "status.client.transport",
                method = %ctx.method(),
                code = ?e.code(),
                "Call failed"
            );
        }

        result
    }
}

/// Status details tonic's server sends when a call's `grpc-timeout` elapses.
const SERVER_TIMEOUT_DETAILS: &str = "Timeout expired";

/// Metadata values travel as HTTP/2 header text: printable ASCII and spaces.
fn is_printable_ascii(value: &str) -> bool {
    value.bytes().all(|b| b == b' ' || b.is_ascii_graphic())
}

/// The server enforces `grpc-timeout` too and reports expiry as CANCELLED.
/// Any other CANCELLED the server sends reaches the caller unchanged.
fn settle_timed<T>(result: Result<T, RpcError>) -> Result<T, RpcError> {
    match result {
        Err(RpcError::Cancelled(details)) if details == SERVER_TIMEOUT_DETAILS => {
            Err(RpcError::DeadlineExceeded(details))
        }
        other => other,
    }
}

fn endpoint(config: &ClientConfig) -> Result<Endpoint, RpcError> {
    Endpoint::from_shared(config.server_url.clone())
        .map(|endpoint| endpoint.connect_timeout(config.connect_timeout))
        .map_err(|e| RpcError::InvalidArgument(format!("Invalid server URL: {e}")))
}

/// Map a status returned by tonic into the error taxonomy.
///
/// Statuses carrying a local error source were produced by the client-side
/// transport (connect failures, broken connections), never by the server.
fn classify(status: Status) -> RpcError {
    if status.code() == Code::Unknown && std::error::Error::source(&status).is_some() {
        return RpcError::Unavailable(status.message().to_string());
    }
    RpcError::from(status)
}
