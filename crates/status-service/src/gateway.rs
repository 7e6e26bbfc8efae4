//! HTTP/JSON gateway for `pb.checkStatus`.
//!
//! Every registered method is exposed as `POST /pb.checkStatus/<method>`
//! taking an empty body or a JSON object (unknown fields are ignored) and
//! answering with the reply message as JSON:
//!
//! ```text
//! POST /pb.checkStatus/getStatus   -> {"msg":"ok","status":200}
//! POST /pb.checkStatus/getStatusA  -> {"msg":"service A is ok from:<host>","status":200}
//! POST /pb.checkStatus/health      -> {}
//! ```
//!
//! The `Authorization` header goes through the same credential check as the
//! gRPC `authorization` metadata, and admitted calls run the same handlers.
//! Failures are answered as `{"code": <gRPC code>, "message": "...",
//! "details": []}` with the HTTP status matching the gRPC code.

use crate::grpc::auth_layer::authenticate;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use proto_gen::{methods, CheckStatus, Empty, TestMsg};
use std::sync::Arc;
use tonic::{Code, Request, Status};
use tracing::instrument;

/// Gateway failure, carrying the gRPC status it mirrors.
#[derive(Debug)]
pub struct GatewayError(Box<Status>);

impl From<Status> for GatewayError {
    fn from(status: Status) -> Self {
        Self(Box::new(status))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let body = serde_json::json!({
            "code": i32::from(code),
            "message": self.0.message(),
            "details": [],
        });

        let mut response = (http_status(code), Json(body)).into_response();

        if code == Code::Unauthenticated {
            if let Ok(value) = "Bearer".parse() {
                response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
            }
        }

        response
    }
}

/// HTTP status for a gRPC code.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        // Client Closed Request
        Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
        Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
            StatusCode::BAD_REQUEST
        }
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Build the gateway router dispatching to `handlers`.
pub fn gateway_router<S: CheckStatus>(handlers: Arc<S>) -> Router {
    Router::new()
        .route(&route(methods::GET_STATUS), post(get_status::<S>))
        .route(&route(methods::GET_STATUS_A), post(get_status_a::<S>))
        .route(&route(methods::HEALTH), post(health::<S>))
        .fallback(unregistered)
        .with_state(handlers)
}

fn route(method: &str) -> String {
    format!("/{method}")
}

/// Check the credential and the body, then build the handler request.
fn inbound(headers: &HeaderMap, body: &[u8]) -> Result<Request<Empty>, GatewayError> {
    let caller = authenticate(headers).map_err(|e| {
        tracing::debug!(target: "status.gateway", reason = ?e, "Credential rejected");
        Status::unauthenticated(e.to_string())
    })?;

    if !body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body).map_err(|e| {
            tracing::debug!(target: "status.gateway", error = %e, "Undecodable request body");
            Status::invalid_argument("Request body must be a JSON object")
        })?;
    }

    let mut request = Request::new(Empty {});
    request.extensions_mut().insert(caller);
    Ok(request)
}

#[instrument(skip_all, name = "status.gateway.get_status")]
async fn get_status<S: CheckStatus>(
    State(handlers): State<Arc<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TestMsg>, GatewayError> {
    let request = inbound(&headers, &body)?;
    Ok(Json(handlers.get_status(request).await?.into_inner()))
}

#[instrument(skip_all, name = "status.gateway.get_status_a")]
async fn get_status_a<S: CheckStatus>(
    State(handlers): State<Arc<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TestMsg>, GatewayError> {
    let request = inbound(&headers, &body)?;
    Ok(Json(handlers.get_status_a(request).await?.into_inner()))
}

#[instrument(skip_all, name = "status.gateway.health")]
async fn health<S: CheckStatus>(
    State(handlers): State<Arc<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Empty>, GatewayError> {
    let request = inbound(&headers, &body)?;
    Ok(Json(handlers.health(request).await?.into_inner()))
}

async fn unregistered(uri: Uri) -> GatewayError {
    tracing::debug!(target: "status.gateway", path = %uri.path(), "Unregistered method");
    GatewayError::from(Status::not_found(format!("Method not found: {}", uri.path())))
}
