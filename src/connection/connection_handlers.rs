use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;
use super::connection_manager::ConnectionState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub connection: ConnectionState,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/health/live",
    responses((status = 200, description = "Process is running")),
    tag = "health"
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness check; probes the backend if it has not answered yet
#[utoipa::path(
    get,
    path = "/api/health/ready",
    responses(
        (status = 200, description = "Backend reachable", body = ReadinessResponse),
        (status = 503, description = "Backend unreachable", body = ReadinessResponse)
    ),
    tag = "health"
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let ready = state.connection.ensure_ready().await;
    let connection = state.connection.snapshot().await;

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, connection }))
}
