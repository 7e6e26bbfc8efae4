//! # Status Test Utilities
//!
//! Shared test utilities for the checkStatus service and client.
//!
//! This crate provides:
//! - Server test harness (`TestStatusServer` for E2E tests)
//! - Handler wrapper counting calls that reach dispatch
//! - Scripted status sources (slow, failing)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use status_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestStatusServer::spawn().await?;
//!     let mut client = server.client().await?;
//!
//!     let request = with_bearer(Empty {}, "abc123");
//!     let reply = client.get_status(request).await?.into_inner();
//!
//!     assert_eq!(reply.status, 200);
//!     Ok(())
//! }
//! ```

pub mod handlers;
pub mod server_harness;
pub mod sources;

// Re-export commonly used items
pub use proto_gen::{Empty, TestMsg};
pub use handlers::*;
pub use server_harness::*;
pub use sources::*;
