//! checkStatus Service
//!
//! Authenticated gRPC status service.
//!
//! # Servers
//!
//! - gRPC server for `pb.checkStatus` (default: 0.0.0.0:50001)
//! - HTTP server for health endpoints (default: 0.0.0.0:8081)
//! - HTTP/JSON gateway for the same methods (default: 0.0.0.0:8889)
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment
//! 2. Bind all listeners (fail fast on bind errors)
//! 3. Start health HTTP server
//! 4. Start gRPC server and gateway, mark ready
//! 5. Wait for shutdown signal, drain, exit

#![warn(clippy::pedantic)]

use std::sync::Arc;
use std::time::Duration;

use status_service::config::Config;
use status_service::gateway::gateway_router;
use status_service::grpc::StatusGrpcService;
use status_service::observability::{health_router, HealthState};
use status_service::server;
use status_service::status::LocalStatusSource;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Structured JSON logs
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "status_service=info,status=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting checkStatus service");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        service_name = %config.service_name,
        instance_id = %config.instance_id,
        grpc_bind_address = %config.grpc_bind_address,
        health_bind_address = %config.health_bind_address,
        gateway_bind_address = %config.gateway_bind_address,
        advertised_host = %config.advertised_host,
        shutdown_grace_seconds = config.shutdown_grace_seconds,
        "Configuration loaded successfully"
    );

    let health_state = Arc::new(HealthState::new());
    let shutdown_token = CancellationToken::new();

    // Bind listeners BEFORE spawning to fail fast on bind errors
    let health_listener = tokio::net::TcpListener::bind(&config.health_bind_address)
        .await
        .map_err(|e| {
            error!(error = %e, addr = %config.health_bind_address, "Failed to bind health server");
            format!(
                "Failed to bind health server to {}: {e}",
                config.health_bind_address
            )
        })?;
    let grpc_listener = server::bind(&config.grpc_bind_address).await?;
    let gateway_listener = tokio::net::TcpListener::bind(&config.gateway_bind_address)
        .await
        .map_err(|e| {
            error!(error = %e, addr = %config.gateway_bind_address, "Failed to bind gateway");
            format!(
                "Failed to bind gateway to {}: {e}",
                config.gateway_bind_address
            )
        })?;

    let health_app = health_router(Arc::clone(&health_state)).layer(TraceLayer::new_for_http());
    let health_shutdown_token = shutdown_token.child_token();
    let health_task = tokio::spawn(async move {
        let server = axum::serve(health_listener, health_app).with_graceful_shutdown(async move {
            health_shutdown_token.cancelled().await;
            info!("Health server shutting down");
        });
        if let Err(e) = server.await {
            error!(error = %e, "Health server failed");
        }
    });
    info!(addr = %config.health_bind_address, "Health server started");

    let handlers = StatusGrpcService::new(Arc::new(LocalStatusSource::new(
        &config.advertised_host,
    )));

    let gateway_app = gateway_router(Arc::new(handlers.clone())).layer(TraceLayer::new_for_http());
    let gateway_shutdown_token = shutdown_token.child_token();
    let gateway_task = tokio::spawn(async move {
        let server = axum::serve(gateway_listener, gateway_app).with_graceful_shutdown(async move {
            gateway_shutdown_token.cancelled().await;
            info!("Gateway shutting down");
        });
        if let Err(e) = server.await {
            error!(error = %e, "Gateway failed");
        }
    });
    info!(addr = %config.gateway_bind_address, "Gateway started");

    let grpc_shutdown_token = shutdown_token.child_token();
    let grpc_config = config.clone();
    let grpc_task = tokio::spawn(async move {
        if let Err(e) = server::serve(grpc_listener, handlers, &grpc_config, grpc_shutdown_token).await {
            error!(error = %e, "gRPC server failed");
        }
    });

    health_state.set_ready();
    info!("checkStatus service running - press Ctrl+C to shutdown");

    shutdown_signal().await;
    info!("Shutdown signal received, initiating graceful shutdown...");

    // Stop advertising readiness before draining
    health_state.set_not_ready();
    shutdown_token.cancel();

    let grace = Duration::from_secs(config.shutdown_grace_seconds);
    let drained = async {
        let _ = tokio::join!(grpc_task, gateway_task);
    };
    if tokio::time::timeout(grace, drained).await.is_err() {
        info!(
            grace_seconds = config.shutdown_grace_seconds,
            "Grace period elapsed with calls still in flight"
        );
    }
    health_task.abort();

    info!("checkStatus service shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        #[expect(
            clippy::expect_used,
            reason = "Signal handler installation is critical - panic is appropriate if it fails"
        )]
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        #[expect(
            clippy::expect_used,
            reason = "Signal handler installation is critical - panic is appropriate if it fails"
        )]
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
