//! Client configuration.

use common::secret::SecretString;
use std::time::Duration;

/// Default server endpoint.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:50001";

/// Default TCP/HTTP2 connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client configuration.
///
/// `Debug` output is safe to log: the token prints as `[REDACTED]`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Server endpoint URL (`http://host:port`).
    pub server_url: String,

    /// Bearer token attached to every call.
    pub token: SecretString,

    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,

    /// Per-call timeout applied when the call does not set its own.
    /// `None` means calls wait indefinitely.
    pub rpc_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration with default timeouts.
    pub fn new(server_url: impl Into<String>, token: SecretString) -> Self {
        Self {
            server_url: server_url.into(),
            token,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            rpc_timeout: None,
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = Some(timeout);
        self
    }

    /// The configured bearer token.
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new(DEFAULT_SERVER_URL, SecretString::from("abc123"));
        assert_eq!(config.server_url, "http://127.0.0.1:50001");
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.rpc_timeout, None);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::new("http://10.0.0.7:50001", SecretString::from("abc123"))
            .with_connect_timeout(Duration::from_millis(250))
            .with_rpc_timeout(Duration::from_secs(3));
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.rpc_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new(DEFAULT_SERVER_URL, SecretString::from("super-secret"));
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
