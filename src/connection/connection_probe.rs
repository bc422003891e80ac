use crate::error::{AppError, Result};
use crate::state::BackendConfig;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// A cheap, read-only request that tells whether the backend answers.
#[async_trait]
pub trait BackendProbe: Send + Sync {
    async fn probe(&self) -> Result<()>;
}

/// Count-only query against the backend's REST interface.
pub struct RestProbe {
    client: reqwest::Client,
    base_url: String,
    access_key: String,
    table: String,
}

impl RestProbe {
    pub fn new(base_url: &str, access_key: &str, table: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            table: table.to_string(),
        }
    }

    fn probe_url(&self) -> String {
        format!("{}/rest/v1/{}?select=count", self.base_url, self.table)
    }
}

#[async_trait]
impl BackendProbe for RestProbe {
    async fn probe(&self) -> Result<()> {
        self.client
            .head(self.probe_url())
            .header("apikey", &self.access_key)
            .bearer_auth(&self.access_key)
            .header("Prefer", "count=exact")
            .header("Cache-Control", "no-store")
            .header("X-Client-Info", concat!("task-notifier@", env!("CARGO_PKG_VERSION")))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Count-only query over a direct Postgres connection.
pub struct PgProbe {
    pool: PgPool,
    table: String,
}

impl PgProbe {
    /// The pool connects on first use, so construction never touches the network.
    pub fn connect_lazy(database_url: &str, table: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(database_url)
            .map_err(|e| AppError::Configuration(format!("Invalid BACKEND_URL: {}", e)))?;

        Ok(Self {
            pool,
            table: table.to_string(),
        })
    }
}

#[async_trait]
impl BackendProbe for PgProbe {
    async fn probe(&self) -> Result<()> {
        // table name is validated as a plain identifier when the config is loaded
        let query = format!("SELECT COUNT(*) FROM {}", self.table);
        let _count = sqlx::query_scalar::<_, i64>(&query).fetch_one(&self.pool).await?;
        Ok(())
    }
}

pub fn probe_from_config(config: &BackendConfig) -> Result<Arc<dyn BackendProbe>> {
    if config.is_postgres() {
        return Ok(Arc::new(PgProbe::connect_lazy(
            &config.url,
            &config.probe_table,
        )?));
    }

    let access_key = config
        .access_key
        .as_deref()
        .ok_or_else(|| AppError::Configuration("BACKEND_ACCESS_KEY must be set".to_string()))?;

    Ok(Arc::new(RestProbe::new(
        &config.url,
        access_key,
        &config.probe_table,
    )))
}
