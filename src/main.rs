mod announcement;
mod auth;
mod connection;
mod error;
mod middleware;
mod notification;
mod routes;
mod state;
mod task;

use connection::{probe_from_config, ConnectionManager, RetryPolicy};
use notification::{FormatterConfig, NotificationService, TelegramDispatcher};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,task_notifier=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing backend credentials are fatal
    let config = Arc::new(Config::from_env()?);

    let probe = probe_from_config(&config.backend)?;
    let connection = Arc::new(ConnectionManager::new(
        probe,
        RetryPolicy {
            cooldown: config.backend.retry_cooldown,
            ..RetryPolicy::default()
        },
    ));

    let dispatcher = TelegramDispatcher::new(&config.telegram);
    if !dispatcher.is_configured() {
        tracing::warn!("Telegram credentials missing, chat notifications are disabled");
    }
    let notification_service = NotificationService::new(
        Arc::new(dispatcher),
        FormatterConfig {
            app_url: config.app_public_url.clone(),
        },
    );

    tracing::info!("Checking backend connection...");
    if !connection.ensure_ready().await {
        tracing::error!("Backend is not reachable yet; /api/health/ready will keep reporting 503");
    }

    let state = AppState {
        config: config.clone(),
        connection,
        notification_service,
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
