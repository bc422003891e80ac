use crate::{
    connection::ConnectionManager,
    error::{AppError, Result},
    notification::NotificationService,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub connection: Arc<ConnectionManager>,
    pub notification_service: NotificationService,
}

/// Credentials for the data-layer backend.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub url: String,
    pub access_key: Option<String>,
    pub probe_table: String,
    pub retry_cooldown: Duration,
}

impl BackendConfig {
    pub fn is_postgres(&self) -> bool {
        self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")
    }
}

#[derive(Clone, Debug)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend: BackendConfig,
    pub telegram: TelegramConfig,
    pub app_public_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
}

pub const DEFAULT_APP_PUBLIC_URL: &str = "https://nesttask.vercel.app";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| AppError::Configuration(format!("{} must be set", key)))
        };

        let url = required("BACKEND_URL")?;
        let access_key = var("BACKEND_ACCESS_KEY");
        let probe_table = var("BACKEND_PROBE_TABLE").unwrap_or_else(|| "tasks".to_string());
        if !is_plain_identifier(&probe_table) {
            return Err(AppError::Configuration(
                "BACKEND_PROBE_TABLE must be a plain identifier".to_string(),
            ));
        }
        let cooldown_secs: u64 = var("BACKEND_RETRY_COOLDOWN_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| {
                AppError::Configuration("BACKEND_RETRY_COOLDOWN_SECS must be a number".to_string())
            })?;

        let backend = BackendConfig {
            url: url.trim_end_matches('/').to_string(),
            access_key,
            probe_table,
            retry_cooldown: Duration::from_secs(cooldown_secs),
        };

        if !backend.is_postgres() && backend.access_key.is_none() {
            return Err(AppError::Configuration(
                "BACKEND_ACCESS_KEY must be set".to_string(),
            ));
        }

        let telegram = TelegramConfig {
            bot_token: var("TELEGRAM_BOT_TOKEN"),
            chat_id: var("TELEGRAM_CHAT_ID"),
            api_base: var("TELEGRAM_API_BASE")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        };

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("PORT must be a number".to_string()))?;

        Ok(Self {
            backend,
            telegram,
            app_public_url: var("APP_PUBLIC_URL")
                .unwrap_or_else(|| DEFAULT_APP_PUBLIC_URL.to_string()),
            jwt_secret: required("JWT_SECRET")?,
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
        })
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
