//! Price catalog backend: ingests supplier quotes and internal budgets,
//! stores a relational price catalog, and answers free-text item-matching
//! queries through a self-improving matching engine.

pub mod commands;
pub mod config;
pub mod database;
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use config::AppConfig;
use services::cache::ResultCache;
use types::{AppError, AppResult};

/// Shared application state: the catalog pool, the injected result cache,
/// and configuration. Cheap to borrow everywhere; owns no global statics.
pub struct AppState {
    pub pool: SqlitePool,
    pub cache: ResultCache,
    pub config: AppConfig,
}

impl AppState {
    /// Connects to the configured database, runs migrations, and builds a
    /// fresh result cache with the configured TTL.
    pub async fn connect(config: AppConfig) -> AppResult<Self> {
        let options: SqliteConnectOptions = config
            .database_url
            .parse::<SqliteConnectOptions>()
            .map_err(|e| AppError::Database(format!("Bad DATABASE_URL: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;

        log::info!("Connected to catalog at {}", config.database_url);

        let cache = ResultCache::new(
            Duration::from_secs(config.cache_ttl_secs),
            services::cache::DEFAULT_CAPACITY,
        );

        Ok(Self {
            pool,
            cache,
            config,
        })
    }
}
