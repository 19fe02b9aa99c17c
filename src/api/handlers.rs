use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::api::ApiState;
use crate::engine::{CycleError, CycleReport};
use crate::model::{ConnectionConfig, ConnectionConfigId, HealthCheckResult, ServiceDefinition, ServiceId};
use crate::store::StoreError;

const DEFAULT_RESULTS_LIMIT: usize = 50;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct CycleStarted {
    pub cycle_id: Uuid,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    pub limit: Option<usize>,
    pub service_id: Option<i64>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("no connection config with id {0}")]
    DatabaseNotFound(ConnectionConfigId),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::DatabaseNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Cycle(_) => {
                tracing::error!(error = %self, "Monitoring API request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "Monitoring system is running",
    })
}

pub async fn get_services(State(state): State<ApiState>) -> Result<Json<Vec<ServiceDefinition>>, ApiError> {
    Ok(Json(state.definitions.list_all().await?))
}

/// Run one cycle and wait for its report.
pub async fn run_checks(State(state): State<ApiState>) -> Result<Json<CycleReport>, ApiError> {
    let report = state.dispatcher.trigger().await?;
    Ok(Json(report))
}

/// Start one cycle and return immediately.
pub async fn start_checks(State(state): State<ApiState>) -> (StatusCode, Json<CycleStarted>) {
    let handle = state.dispatcher.trigger();
    let cycle_id = handle.cycle_id();

    tokio::spawn(async move {
        if let Err(e) = handle.await {
            tracing::error!(%cycle_id, error = %e, "On-demand cycle failed");
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(CycleStarted {
            cycle_id,
            status: "Health checks started",
        }),
    )
}

pub async fn get_results(
    State(state): State<ApiState>,
    Query(query): Query<ResultsQuery>,
) -> Json<Vec<HealthCheckResult>> {
    let limit = query.limit.unwrap_or(DEFAULT_RESULTS_LIMIT);

    let results = match query.service_id {
        Some(id) => state.results.recent_for(ServiceId(id), limit),
        None => state.results.recent(limit),
    };

    Json(results)
}

pub async fn get_databases(State(state): State<ApiState>) -> Result<Json<Vec<ConnectionConfig>>, ApiError> {
    Ok(Json(state.databases.list_configs().await?))
}

pub async fn get_database(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<Json<ConnectionConfig>, ApiError> {
    let id = ConnectionConfigId(id);
    state
        .databases
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or(ApiError::DatabaseNotFound(id))
}
