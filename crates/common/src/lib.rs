//! Common utilities and types shared across checkStatus components.

#![warn(clippy::pedantic)]

/// Module for bearer credentials carried in call metadata
pub mod credential;

/// Module for the RPC error taxonomy shared by client and server
pub mod error;

/// Module for secret types that prevent accidental logging
pub mod secret;
