//! Scripted status sources for driving the server in tests.

use async_trait::async_trait;
use status_service::errors::StatusServiceError;
use status_service::status::{StatusSnapshot, StatusSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::server_harness::TEST_ADVERTISED_HOST;

/// Source that sleeps before answering.
pub struct SlowStatusSource {
    delay: Duration,
    started: AtomicUsize,
    completed: AtomicUsize,
}

impl SlowStatusSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Calls that reached the source.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Calls that ran to completion (not cancelled mid-sleep).
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    async fn answer(&self, snapshot: StatusSnapshot) -> Result<StatusSnapshot, StatusServiceError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(snapshot)
    }
}

#[async_trait]
impl StatusSource for SlowStatusSource {
    async fn primary(&self) -> Result<StatusSnapshot, StatusServiceError> {
        self.answer(StatusSnapshot::ok("ok")).await
    }

    async fn secondary(&self) -> Result<StatusSnapshot, StatusServiceError> {
        self.answer(StatusSnapshot::ok(format!(
            "service A is ok from:{TEST_ADVERTISED_HOST}"
        )))
        .await
    }
}

/// Source whose reads always fail.
#[derive(Default)]
pub struct FailingStatusSource;

#[async_trait]
impl StatusSource for FailingStatusSource {
    async fn primary(&self) -> Result<StatusSnapshot, StatusServiceError> {
        Err(StatusServiceError::StatusUnavailable(
            "backend 10.9.8.7 refused connection".to_string(),
        ))
    }

    async fn secondary(&self) -> Result<StatusSnapshot, StatusServiceError> {
        Err(StatusServiceError::Internal("secondary probe crashed".to_string()))
    }
}
