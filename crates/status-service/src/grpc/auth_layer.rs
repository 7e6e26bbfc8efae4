//! Credential-check and route-table layer for the `pb.checkStatus` service.
//!
//! Every call passes through [`CheckStatusLayer`] before it reaches dispatch:
//!
//! 1. The request path must name one of the registered methods, otherwise
//!    the call is answered with `NOT_FOUND`.
//! 2. The `authorization` metadata entry must be `Bearer <token>`, otherwise
//!    the call is answered with `UNAUTHENTICATED` and no payload.
//! 3. The validated caller is stored in the request extensions as
//!    [`AuthenticatedCaller`] and the call continues to the handler.
//!
//! The check is identical for all methods and cannot be skipped per method.
//!
//! # Security
//!
//! - Token validation is structural (scheme, non-empty, 8KB size limit)
//! - Generic error messages prevent information leakage
//! - Tokens are never logged, only their length

use axum::http;
use common::credential::{self, CredentialError, AUTHORIZATION_KEY};
use common::secret::{ExposeSecret, SecretString};
use proto_gen::methods;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tonic::body::BoxBody;
use tonic::Status;
use tower::{Layer, Service};
use tracing::instrument;

/// Caller whose credential passed the check.
///
/// Inserted into request extensions by [`CheckStatusService`]; handlers
/// refuse to run without it.
#[derive(Clone, Debug)]
pub struct AuthenticatedCaller {
    token: SecretString,
}

impl AuthenticatedCaller {
    /// The caller's bearer token.
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Token length in bytes (safe to log).
    pub fn token_len(&self) -> usize {
        self.token.expose_secret().len()
    }
}

/// Extract and validate the bearer credential from request headers.
///
/// gRPC metadata travels as HTTP/2 headers, whose names are always
/// lowercase, so the lookup is case-insensitive.
pub fn authenticate(headers: &http::HeaderMap) -> Result<AuthenticatedCaller, CredentialError> {
    let value = headers
        .get(AUTHORIZATION_KEY)
        .ok_or(CredentialError::Missing)?;
    let value = value
        .to_str()
        .map_err(|_| CredentialError::InvalidEncoding)?;
    let token = credential::parse_bearer(value)?;

    Ok(AuthenticatedCaller {
        token: SecretString::from(token),
    })
}

/// Run the route and credential checks for one call.
#[instrument(skip_all, name = "status.grpc.admit", fields(path = %req.uri().path()))]
#[expect(
    clippy::result_large_err,
    reason = "Status is the standard gRPC error type"
)]
pub fn admit<B>(req: &http::Request<B>) -> Result<AuthenticatedCaller, Status> {
    let path = req.uri().path();

    if !methods::is_registered_path(path) {
        tracing::debug!(target: "status.grpc.auth", "Unregistered method");
        return Err(Status::not_found(format!("Method not found: {path}")));
    }

    let caller = authenticate(req.headers()).map_err(|e| {
        tracing::debug!(target: "status.grpc.auth", reason = ?e, "Credential rejected");
        Status::unauthenticated(e.to_string())
    })?;

    tracing::trace!(
        target: "status.grpc.auth",
        token_len = caller.token_len(),
        "Authorization validated"
    );

    Ok(caller)
}

/// Tower layer applying [`admit`] ahead of the gRPC router.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckStatusLayer;

impl CheckStatusLayer {
    /// Create a new layer.
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for CheckStatusLayer {
    type Service = CheckStatusService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CheckStatusService { inner }
    }
}

/// Tower service produced by [`CheckStatusLayer`].
#[derive(Clone, Debug)]
pub struct CheckStatusService<S> {
    inner: S,
}

impl<S, ReqBody> Service<http::Request<ReqBody>> for CheckStatusService<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<BoxBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: http::Request<ReqBody>) -> Self::Future {
        match admit(&req) {
            Ok(caller) => {
                req.extensions_mut().insert(caller);
                Box::pin(self.inner.call(req))
            }
            Err(status) => Box::pin(async move { Ok(status.into_http()) }),
        }
    }
}
