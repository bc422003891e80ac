use crate::{
    announcement::Announcement,
    connection::{self, ConnectionPhase, ConnectionState, ReadinessResponse},
    notification::{self, EventAcceptedResponse},
    state::AppState,
    task::{Task, TaskCategory, TaskStatus},
};
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        connection::connection_handlers::liveness,
        connection::connection_handlers::readiness,
        notification::notification_handlers::task_created,
        notification::notification_handlers::announcement_created,
    ),
    components(
        schemas(
            Task,
            TaskCategory,
            TaskStatus,
            Announcement,
            EventAcceptedResponse,
            ReadinessResponse,
            ConnectionState,
            ConnectionPhase,
        )
    ),
    tags(
        (name = "health", description = "Liveness and backend readiness"),
        (name = "events", description = "Domain events that trigger chat notifications")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/health", connection::routes::health_routes())
        .nest("/events", notification::routes::event_routes(state.clone()));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::tests::service_token;
    use crate::connection::{BackendProbe, ConnectionManager, RetryPolicy};
    use crate::error::{AppError, Result};
    use crate::notification::notification_service::tests::{
        sample_announcement, sample_task, RecordingDispatcher,
    };
    use crate::notification::{FormatterConfig, NotificationService};
    use crate::state::{BackendConfig, Config, TelegramConfig};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    struct FixedProbe(bool);

    #[async_trait]
    impl BackendProbe for FixedProbe {
        async fn probe(&self) -> Result<()> {
            if self.0 {
                Ok(())
            } else {
                Err(AppError::Connectivity("down".into()))
            }
        }
    }

    fn app(backend_up: bool, dispatcher: Arc<RecordingDispatcher>) -> Router {
        let config = Config {
            backend: BackendConfig {
                url: "https://db.example.com".into(),
                access_key: Some("anon".into()),
                probe_table: "tasks".into(),
                retry_cooldown: Duration::from_secs(30),
            },
            telegram: TelegramConfig {
                bot_token: None,
                chat_id: None,
                api_base: "https://api.telegram.org".into(),
            },
            app_public_url: "https://tasks.example.com".into(),
            jwt_secret: SECRET.into(),
            host: "127.0.0.1".into(),
            port: 3000,
        };
        let policy = RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            cooldown: Duration::from_secs(30),
        };

        create_router(AppState {
            config: Arc::new(config),
            connection: Arc::new(ConnectionManager::new(Arc::new(FixedProbe(backend_up)), policy)),
            notification_service: NotificationService::new(
                dispatcher,
                FormatterConfig {
                    app_url: "https://tasks.example.com".into(),
                },
            ),
        })
    }

    fn post_json(uri: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let response = app(true, RecordingDispatcher::new(true))
            .oneshot(Request::get("/api/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_when_backend_up() {
        let response = app(true, RecordingDispatcher::new(true))
            .oneshot(Request::get("/api/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ready"], true);
        assert_eq!(body["connection"]["phase"], "ready");
    }

    #[tokio::test]
    async fn test_readiness_when_backend_down() {
        let response = app(false, RecordingDispatcher::new(true))
            .oneshot(Request::get("/api/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["ready"], false);
        assert_eq!(body["connection"]["phase"], "exhausted");
        assert_eq!(body["connection"]["attempt_count"], 2);
    }

    #[tokio::test]
    async fn test_task_event_requires_token() {
        let dispatcher = RecordingDispatcher::new(true);
        let body = serde_json::to_value(sample_task()).unwrap();

        let response = app(true, dispatcher.clone())
            .oneshot(post_json("/api/events/tasks", body, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(dispatcher.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_task_event_accepted_even_when_delivery_fails() {
        let dispatcher = RecordingDispatcher::new(false);
        let token = service_token(SECRET, chrono::Duration::minutes(5));
        let body = serde_json::to_value(sample_task()).unwrap();

        let response = app(true, dispatcher.clone())
            .oneshot(post_json("/api/events/tasks", body, Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(body_json(response).await["accepted"], true);

        // spawned delivery runs on its own
        for _ in 0..50 {
            if !dispatcher.sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(dispatcher.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_announcement_event_with_blank_title_rejected() {
        let dispatcher = RecordingDispatcher::new(true);
        let token = service_token(SECRET, chrono::Duration::minutes(5));
        let mut body = serde_json::to_value(sample_announcement()).unwrap();
        body["title"] = "".into();

        let response = app(true, dispatcher.clone())
            .oneshot(post_json("/api/events/announcements", body, Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(dispatcher.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_openapi_lists_event_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/events/tasks"));
        assert!(doc.paths.paths.contains_key("/api/events/announcements"));
        assert!(doc.paths.paths.contains_key("/api/health/ready"));
    }
}
