use axum::{middleware, routing::post, Router};
use crate::{middleware::auth_middleware, state::AppState};
use super::notification_handlers::{announcement_created, task_created};

pub fn event_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/tasks", post(task_created))
        .route("/announcements", post(announcement_created))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
