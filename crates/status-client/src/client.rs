//! Typed client for the `pb.checkStatus` operations.

use crate::config::ClientConfig;
use crate::transport::{CallContext, RpcChannel};
use common::credential::{bearer_value, AUTHORIZATION_KEY};
use common::error::RpcError;
use common::secret::{ExposeSecret, SecretString};
use proto_gen::{methods, Empty, TestMsg};
use serde::Serialize;
use std::fmt;
use tracing::instrument;

/// One of the three service operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Operation {
    /// `getStatus(Empty) -> TestMsg`
    GetStatus,
    /// `getStatusA(Empty) -> TestMsg`
    GetStatusA,
    /// `health(Empty) -> Empty`
    Health,
}

impl Operation {
    /// Service-qualified method name.
    pub fn method(self) -> &'static str {
        match self {
            Operation::GetStatus => methods::GET_STATUS,
            Operation::GetStatusA => methods::GET_STATUS_A,
            Operation::Health => methods::HEALTH,
        }
    }

    /// Wire name of the method.
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetStatus => "getStatus",
            Operation::GetStatusA => "getStatusA",
            Operation::Health => "health",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Successful reply of an [`Operation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Status(TestMsg),
    Health(Empty),
}

/// checkStatus client.
///
/// Every call carries `authorization: Bearer <token>`. Errors are returned
/// unchanged and never retried.
#[derive(Clone, Debug)]
pub struct StatusClient {
    channel: RpcChannel,
}

impl StatusClient {
    pub fn new(channel: RpcChannel) -> Self {
        Self { channel }
    }

    /// Connect to `config.server_url`.
    pub async fn connect(config: &ClientConfig) -> Result<Self, RpcError> {
        Ok(Self::new(RpcChannel::connect(config).await?))
    }

    /// Build the call context for `operation` authenticated with `token`.
    ///
    /// Add a timeout or cancellation token before passing it to
    /// [`execute`](Self::execute).
    pub fn context(&self, operation: Operation, token: &SecretString) -> CallContext {
        CallContext::new(operation.method())
            .with_metadata(AUTHORIZATION_KEY, bearer_value(token.expose_secret()))
    }

    /// Invoke `operation` with `token`.
    pub async fn invoke(&self, operation: Operation, token: &SecretString) -> Result<Reply, RpcError> {
        self.execute(operation, &self.context(operation, token)).await
    }

    /// Invoke `operation` with a prepared context.
    #[instrument(skip_all, name = "status.client.invoke", fields(operation = %operation))]
    pub async fn execute(&self, operation: Operation, ctx: &CallContext) -> Result<Reply, RpcError> {
        match operation {
            Operation::GetStatus | Operation::GetStatusA => self
                .channel
                .call::<Empty, TestMsg>(ctx, Empty {})
                .await
                .map(Reply::Status),
            Operation::Health => self
                .channel
                .call::<Empty, Empty>(ctx, Empty {})
                .await
                .map(Reply::Health),
        }
    }

    pub async fn get_status(&self, token: &SecretString) -> Result<TestMsg, RpcError> {
        let ctx = self.context(Operation::GetStatus, token);
        self.channel.call(&ctx, Empty {}).await
    }

    pub async fn get_status_a(&self, token: &SecretString) -> Result<TestMsg, RpcError> {
        let ctx = self.context(Operation::GetStatusA, token);
        self.channel.call(&ctx, Empty {}).await
    }

    pub async fn health(&self, token: &SecretString) -> Result<Empty, RpcError> {
        let ctx = self.context(Operation::Health, token);
        self.channel.call(&ctx, Empty {}).await
    }
}
