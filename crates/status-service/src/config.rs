//! Status service configuration.
//!
//! Configuration is loaded from environment variables. Nothing here is
//! sensitive; bearer tokens only ever arrive as call metadata.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Default gRPC bind address.
pub const DEFAULT_GRPC_BIND_ADDRESS: &str = "0.0.0.0:50001";

/// Default health endpoint bind address.
pub const DEFAULT_HEALTH_BIND_ADDRESS: &str = "0.0.0.0:8081";

/// Default HTTP/JSON gateway bind address.
pub const DEFAULT_GATEWAY_BIND_ADDRESS: &str = "0.0.0.0:8889";

/// Default service name.
pub const DEFAULT_SERVICE_NAME: &str = "test";

/// Default host reported in the secondary status snapshot.
pub const DEFAULT_ADVERTISED_HOST: &str = "127.0.0.1";

/// Default time given to in-flight calls after shutdown is requested.
pub const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 2;

/// Status service configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// gRPC server bind address (default: "0.0.0.0:50001").
    pub grpc_bind_address: String,

    /// Health endpoint bind address (default: "0.0.0.0:8081").
    pub health_bind_address: String,

    /// HTTP/JSON gateway bind address (default: "0.0.0.0:8889").
    pub gateway_bind_address: String,

    /// Logical service name used in logs (default: "test").
    pub service_name: String,

    /// Host this instance reports in `getStatusA` (default: "127.0.0.1").
    pub advertised_host: String,

    /// Unique identifier for this instance.
    pub instance_id: String,

    /// Per-connection HTTP/2 stream limit. `None` keeps the transport default.
    pub max_concurrent_streams: Option<u32>,

    /// Seconds to wait for in-flight calls on shutdown (default: 2).
    pub shutdown_grace_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let grpc_bind_address = vars
            .get("STATUS_GRPC_BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_GRPC_BIND_ADDRESS.to_string());
        validate_socket_addr("STATUS_GRPC_BIND_ADDRESS", &grpc_bind_address)?;

        let health_bind_address = vars
            .get("STATUS_HEALTH_BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_HEALTH_BIND_ADDRESS.to_string());
        validate_socket_addr("STATUS_HEALTH_BIND_ADDRESS", &health_bind_address)?;

        let gateway_bind_address = vars
            .get("STATUS_GATEWAY_BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_GATEWAY_BIND_ADDRESS.to_string());
        validate_socket_addr("STATUS_GATEWAY_BIND_ADDRESS", &gateway_bind_address)?;

        let service_name = vars
            .get("STATUS_SERVICE_NAME")
            .cloned()
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
        if service_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "STATUS_SERVICE_NAME must not be empty".to_string(),
            ));
        }

        let advertised_host = vars
            .get("STATUS_ADVERTISED_HOST")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ADVERTISED_HOST.to_string());

        let max_concurrent_streams = match vars.get("STATUS_MAX_CONCURRENT_STREAMS") {
            Some(raw) => Some(raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "STATUS_MAX_CONCURRENT_STREAMS must be a positive integer, got '{raw}'"
                ))
            })?),
            None => None,
        };

        let shutdown_grace_seconds = match vars.get("STATUS_SHUTDOWN_GRACE_SECONDS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(format!(
                    "STATUS_SHUTDOWN_GRACE_SECONDS must be a non-negative integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_SHUTDOWN_GRACE_SECONDS,
        };

        // Generate instance ID
        let instance_id = vars.get("STATUS_INSTANCE_ID").cloned().unwrap_or_else(|| {
            let uuid_suffix = uuid::Uuid::new_v4().to_string();
            let short_suffix = uuid_suffix.get(..8).unwrap_or("00000000");
            format!("{service_name}-{short_suffix}")
        });

        Ok(Config {
            grpc_bind_address,
            health_bind_address,
            gateway_bind_address,
            service_name,
            advertised_host,
            instance_id,
            max_concurrent_streams,
            shutdown_grace_seconds,
        })
    }
}

fn validate_socket_addr(var: &str, value: &str) -> Result<(), ConfigError> {
    value.parse::<SocketAddr>().map(|_| ()).map_err(|e| {
        ConfigError::InvalidValue(format!("{var} must be a host:port address ({e}): '{value}'"))
    })
}
