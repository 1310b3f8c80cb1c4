//! Database Module
//!
//! Handles SQLite connection pool and migrations

pub mod repository;

use crate::core::Config;
use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;

/// Owner of the SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database with WAL mode and apply migrations
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            // 写冲突时等待而非立即失败
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(
            url = %config.database_url,
            busy_timeout_ms = config.busy_timeout_ms,
            "Database connection established (SQLite WAL)"
        );

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database for tests
    ///
    /// Single connection that never idles out: every connection to
    /// `sqlite::memory:` would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::database(format!("Invalid database url: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}
