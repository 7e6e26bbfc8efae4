//! checkStatus Client Library
//!
//! Client side of the `pb.checkStatus` gRPC service.
//!
//! # Modules
//!
//! - [`config`] - Endpoint, token and timeout settings
//! - [`transport`] - Authenticated unary RPC transport ([`RpcChannel`])
//! - [`client`] - Typed operations ([`StatusClient::invoke`])
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ClientConfig::new("http://127.0.0.1:50001", SecretString::from("abc123"));
//! let client = StatusClient::connect(&config).await?;
//! let reply = client.invoke(Operation::GetStatus, config.token()).await?;
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod config;
pub mod transport;

pub use client::{Operation, Reply, StatusClient};
pub use config::ClientConfig;
pub use transport::{CallContext, RpcChannel};
