//! Status snapshots and the sources that produce them.
//!
//! Handlers for `getStatus` and `getStatusA` read from a [`StatusSource`].
//! The default [`LocalStatusSource`] keeps both snapshots in memory behind
//! read-mostly locks: readers proceed concurrently, an update excludes
//! readers and other writers.

use crate::errors::StatusServiceError;
use async_trait::async_trait;
use proto_gen::TestMsg;
use tokio::sync::RwLock;

/// Status code reported for a healthy snapshot.
pub const STATUS_OK: i32 = 200;

/// A point-in-time status report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Human-readable status message.
    pub message: String,
    /// Application status code (HTTP-style, 200 = ok).
    pub code: i32,
}

impl StatusSnapshot {
    /// Create a snapshot with the given message and code.
    pub fn new(message: impl Into<String>, code: i32) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Create a healthy snapshot.
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(message, STATUS_OK)
    }
}

impl From<StatusSnapshot> for TestMsg {
    fn from(snapshot: StatusSnapshot) -> Self {
        TestMsg {
            msg: snapshot.message,
            status: snapshot.code,
        }
    }
}

/// Source of status snapshots.
///
/// Implementations must be safe to call from many concurrent handlers.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Current status snapshot (served by `getStatus`).
    async fn primary(&self) -> Result<StatusSnapshot, StatusServiceError>;

    /// Secondary status snapshot (served by `getStatusA`).
    async fn secondary(&self) -> Result<StatusSnapshot, StatusServiceError>;
}

/// In-memory status source.
#[derive(Debug)]
pub struct LocalStatusSource {
    primary: RwLock<StatusSnapshot>,
    secondary: RwLock<StatusSnapshot>,
}

impl LocalStatusSource {
    /// Create a source reporting healthy snapshots for `advertised_host`.
    pub fn new(advertised_host: &str) -> Self {
        Self::with_snapshots(
            StatusSnapshot::ok("ok"),
            StatusSnapshot::ok(format!("service A is ok from:{advertised_host}")),
        )
    }

    /// Create a source with explicit initial snapshots.
    pub fn with_snapshots(primary: StatusSnapshot, secondary: StatusSnapshot) -> Self {
        Self {
            primary: RwLock::new(primary),
            secondary: RwLock::new(secondary),
        }
    }

    /// Replace the primary snapshot.
    pub async fn set_primary(&self, snapshot: StatusSnapshot) {
        *self.primary.write().await = snapshot;
    }

    /// Replace the secondary snapshot.
    pub async fn set_secondary(&self, snapshot: StatusSnapshot) {
        *self.secondary.write().await = snapshot;
    }
}

#[async_trait]
impl StatusSource for LocalStatusSource {
    async fn primary(&self) -> Result<StatusSnapshot, StatusServiceError> {
        Ok(self.primary.read().await.clone())
    }

    async fn secondary(&self) -> Result<StatusSnapshot, StatusServiceError> {
        Ok(self.secondary.read().await.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_local_source_defaults() {
        let source = LocalStatusSource::new("10.0.0.7");

        let primary = source.primary().await.unwrap();
        assert_eq!(primary, StatusSnapshot::new("ok", 200));

        let secondary = source.secondary().await.unwrap();
        assert_eq!(secondary.message, "service A is ok from:10.0.0.7");
        assert_eq!(secondary.code, STATUS_OK);
    }

    #[tokio::test]
    async fn test_updates_are_visible_to_readers() {
        let source = LocalStatusSource::new("127.0.0.1");

        source
            .set_primary(StatusSnapshot::new("degraded", 503))
            .await;

        assert_eq!(
            source.primary().await.unwrap(),
            StatusSnapshot::new("degraded", 503)
        );
        // Secondary untouched
        assert_eq!(source.secondary().await.unwrap().code, STATUS_OK);
    }

    #[tokio::test]
    async fn test_concurrent_readers_and_writer() {
        let source = Arc::new(LocalStatusSource::new("127.0.0.1"));

        let mut handles = Vec::new();
        for i in 0..20 {
            let source = Arc::clone(&source);
            handles.push(tokio::spawn(async move {
                if i == 10 {
                    source.set_secondary(StatusSnapshot::new("updated", 201)).await;
                }
                source.secondary().await.unwrap()
            }));
        }

        for handle in handles {
            let snapshot = handle.await.unwrap();
            // Readers only ever observe a complete snapshot
            assert!(
                snapshot == StatusSnapshot::new("updated", 201)
                    || snapshot.message == "service A is ok from:127.0.0.1"
            );
        }
    }

    #[test]
    fn test_snapshot_into_test_msg() {
        let msg: TestMsg = StatusSnapshot::ok("ok").into();
        assert_eq!(msg.msg, "ok");
        assert_eq!(msg.status, 200);
    }
}
