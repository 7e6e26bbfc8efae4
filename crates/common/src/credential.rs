//! Bearer credentials carried as call metadata.
//!
//! A credential is a single metadata entry, `authorization: Bearer <token>`.
//! Metadata keys are case-insensitive and always travel in lowercase; the
//! `Bearer` scheme itself is case-sensitive and must be followed by exactly
//! one space.

use thiserror::Error;

/// Metadata key holding the credential (already normalized).
pub const AUTHORIZATION_KEY: &str = "authorization";

/// Scheme prefix of a well-formed credential value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Maximum accepted token size in bytes (8KB).
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Reasons a credential is rejected.
///
/// `Display` strings are the client-facing status details. They never
/// contain the token itself.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// No `authorization` entry in the call metadata.
    #[error("Missing authorization header")]
    Missing,

    /// The value is not printable ASCII.
    #[error("Invalid authorization format")]
    InvalidEncoding,

    /// The value does not start with `Bearer `.
    #[error("Invalid authorization format")]
    InvalidScheme,

    /// `Bearer ` followed by nothing.
    #[error("Empty token")]
    EmptyToken,

    /// Token larger than [`MAX_TOKEN_SIZE_BYTES`].
    #[error("Invalid token")]
    TooLarge,
}

/// Normalize a metadata key for transmission and lookup.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

/// Build the `authorization` metadata value for `token`.
#[must_use]
pub fn bearer_value(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}

/// Extract the token from an `authorization` metadata value.
///
/// # Errors
///
/// Returns a [`CredentialError`] when the value is not of the form
/// `Bearer <token>` or the token is empty or oversized.
pub fn parse_bearer(value: &str) -> Result<&str, CredentialError> {
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(CredentialError::InvalidScheme)?;

    if token.is_empty() {
        return Err(CredentialError::EmptyToken);
    }

    if token.starts_with(char::is_whitespace) {
        return Err(CredentialError::InvalidScheme);
    }

    if token.len() > MAX_TOKEN_SIZE_BYTES {
        return Err(CredentialError::TooLarge);
    }

    Ok(token)
}
