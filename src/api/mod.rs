//! Monitoring API.
//!
//! # Routes
//! - `GET  /api/monitoring/status`   liveness of the monitor itself
//! - `GET  /api/monitoring/services` current service definitions
//! - `POST /api/monitoring/check`    run one cycle now and return its report
//! - `POST /api/monitoring/run`      start one cycle, return its id (202)
//! - `GET  /api/monitoring/results`  most recent health records
//! - `GET  /api/monitoring/databases`      connection configs, passwords omitted
//! - `GET  /api/monitoring/databases/{id}` one connection config
//!
//! The catalog is file-backed, so there are no write endpoints.

pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::engine::Dispatcher;
use crate::store::{ConnectionConfigSource, DefinitionSource, ResultLog};
use self::handlers::*;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct ApiState {
    pub dispatcher: Arc<Dispatcher>,
    pub definitions: Arc<dyn DefinitionSource>,
    pub databases: Arc<dyn ConnectionConfigSource>,
    pub results: Arc<ResultLog>,
}

/// Build the router with all middleware layers.
#[allow(deprecated)]
pub fn router(state: ApiState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/monitoring/status", get(get_status))
        .route("/api/monitoring/services", get(get_services))
        .route("/api/monitoring/check", post(run_checks))
        .route("/api/monitoring/run", post(start_checks))
        .route("/api/monitoring/results", get(get_results))
        .route("/api/monitoring/databases", get(get_databases))
        .route("/api/monitoring/databases/{id}", get(get_database))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
}

/// Serve `app` until the shutdown signal fires.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Monitoring API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Monitoring API stopped");
    Ok(())
}
