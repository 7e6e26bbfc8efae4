//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Bearer tokens
//! handled by the client and the CLI are always stored as [`SecretString`].
//!
//! `SecretString` implements `Debug` with redaction, so any struct deriving
//! `Debug` that holds a token is safe to log via `{:?}` or tracing. The value
//! is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct CallCredentials {
//!     caller: String,
//!     token: SecretString, // Debug shows "[REDACTED]"
//! }
//!
//! let creds = CallCredentials {
//!     caller: "cli".to_string(),
//!     token: SecretString::from("abc123"),
//! };
//!
//! assert!(!format!("{creds:?}").contains("abc123"));
//! assert_eq!(creds.token.expose_secret(), "abc123");
//! ```

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretString};
