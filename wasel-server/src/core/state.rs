use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppResult;

/// Shared application state handed to every handler.
///
/// Cloning is cheap: the config sits behind an `Arc` and the pool is
/// internally reference-counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
}

impl ServerState {
    /// Open the database (applying migrations) and assemble the state
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self {
            config: Arc::new(config.clone()),
            pool: db.pool,
        })
    }

    #[cfg(test)]
    pub(crate) async fn for_tests() -> Self {
        Self {
            config: Arc::new(Config {
                work_dir: ".".into(),
                http_port: 0,
                database_path: ":memory:".into(),
                request_timeout_ms: 5000,
                pending_clearing_hours: 24,
                clearing_interval_secs: 1,
                environment: "test".into(),
            }),
            pool: crate::db::memory_pool().await,
        }
    }
}
