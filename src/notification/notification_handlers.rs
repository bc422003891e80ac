use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use crate::{
    announcement::Announcement,
    error::Result,
    middleware::CallerService,
    state::AppState,
    task::Task,
};
use super::notification_dto::EventAcceptedResponse;

/// Notify the chat that a task was created
#[utoipa::path(
    post,
    path = "/api/events/tasks",
    request_body = Task,
    responses(
        (status = 202, description = "Event accepted, notification queued", body = EventAcceptedResponse),
        (status = 400, description = "Invalid task"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn task_created(
    State(state): State<AppState>,
    Extension(CallerService(caller)): Extension<CallerService>,
    Json(task): Json<Task>,
) -> Result<(StatusCode, Json<EventAcceptedResponse>)> {
    task.validate()?;
    tracing::info!(%caller, task_id = %task.id, "Task created event received");

    // Outcome is logged by the service; the caller's mutation already succeeded.
    let _ = state.notification_service.spawn_task_created(task);

    Ok((
        StatusCode::ACCEPTED,
        Json(EventAcceptedResponse {
            accepted: true,
            notifications_enabled: state.notification_service.is_enabled(),
        }),
    ))
}

/// Notify the chat that an announcement was posted
#[utoipa::path(
    post,
    path = "/api/events/announcements",
    request_body = Announcement,
    responses(
        (status = 202, description = "Event accepted, notification queued", body = EventAcceptedResponse),
        (status = 400, description = "Invalid announcement"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn announcement_created(
    State(state): State<AppState>,
    Extension(CallerService(caller)): Extension<CallerService>,
    Json(announcement): Json<Announcement>,
) -> Result<(StatusCode, Json<EventAcceptedResponse>)> {
    announcement.validate()?;
    tracing::info!(%caller, announcement_id = %announcement.id, "Announcement event received");

    let _ = state
        .notification_service
        .spawn_announcement_created(announcement);

    Ok((
        StatusCode::ACCEPTED,
        Json(EventAcceptedResponse {
            accepted: true,
            notifications_enabled: state.notification_service.is_enabled(),
        }),
    ))
}
