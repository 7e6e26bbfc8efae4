//! Observability endpoints for the status service.
//!
//! Liveness and readiness are served over plain HTTP on a separate port so
//! orchestrators can probe the process without a bearer token.

pub mod health;

pub use health::{health_router, HealthState};
