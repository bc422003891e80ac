use axum::{routing::get, Router};
use crate::state::AppState;
use super::connection_handlers::{liveness, readiness};

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}
