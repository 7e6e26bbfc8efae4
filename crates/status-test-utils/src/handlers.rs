//! Handler wrapper that records every call reaching dispatch.

use proto_gen::{CheckStatus, Empty, TestMsg};
use status_service::grpc::StatusGrpcService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Per-method count of calls that entered a handler.
#[derive(Debug, Default)]
pub struct HandlerCalls {
    get_status: AtomicUsize,
    get_status_a: AtomicUsize,
    health: AtomicUsize,
}

impl HandlerCalls {
    pub fn get_status(&self) -> usize {
        self.get_status.load(Ordering::SeqCst)
    }

    pub fn get_status_a(&self) -> usize {
        self.get_status_a.load(Ordering::SeqCst)
    }

    pub fn health(&self) -> usize {
        self.health.load(Ordering::SeqCst)
    }

    /// Calls that entered any handler.
    pub fn total(&self) -> usize {
        self.get_status() + self.get_status_a() + self.health()
    }
}

/// [`StatusGrpcService`] that bumps [`HandlerCalls`] on entry to each
/// handler, before the handler runs.
///
/// Calls rejected by the credential-check layer never get here, so a zero
/// count proves dispatch was skipped for every method, `health` included.
pub struct CountingCheckStatus {
    inner: StatusGrpcService,
    calls: Arc<HandlerCalls>,
}

impl CountingCheckStatus {
    pub fn new(inner: StatusGrpcService, calls: Arc<HandlerCalls>) -> Self {
        Self { inner, calls }
    }
}

#[tonic::async_trait]
impl CheckStatus for CountingCheckStatus {
    async fn get_status(&self, request: Request<Empty>) -> Result<Response<TestMsg>, Status> {
        self.calls.get_status.fetch_add(1, Ordering::SeqCst);
        self.inner.get_status(request).await
    }

    async fn get_status_a(&self, request: Request<Empty>) -> Result<Response<TestMsg>, Status> {
        self.calls.get_status_a.fetch_add(1, Ordering::SeqCst);
        self.inner.get_status_a(request).await
    }

    async fn health(&self, request: Request<Empty>) -> Result<Response<Empty>, Status> {
        self.calls.health.fetch_add(1, Ordering::SeqCst);
        self.inner.health(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use status_service::status::LocalStatusSource;

    #[tokio::test]
    async fn test_counts_each_method_separately() {
        let calls = Arc::new(HandlerCalls::default());
        let handlers = CountingCheckStatus::new(
            StatusGrpcService::new(Arc::new(LocalStatusSource::new("127.0.0.1"))),
            Arc::clone(&calls),
        );

        // Unadmitted requests are refused by the handler but still counted
        assert!(handlers.health(Request::new(Empty {})).await.is_err());
        assert!(handlers.get_status(Request::new(Empty {})).await.is_err());

        assert_eq!(calls.health(), 1);
        assert_eq!(calls.get_status(), 1);
        assert_eq!(calls.get_status_a(), 0);
        assert_eq!(calls.total(), 2);
    }
}
