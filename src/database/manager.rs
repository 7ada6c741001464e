use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Recipe serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_DRINK_TABLE: &str = "CREATE TABLE IF NOT EXISTS drink (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL UNIQUE,
    recipe TEXT NOT NULL
)";

const SEED_TITLE: &str = "water";
const SEED_RECIPE: &str = r#"[{"name": "water", "color": "blue", "parts": 1}]"#;

/// Owns the connection pool for the lifetime of the process
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Self::connect_with(&config.url, config.max_connections, config.connection_timeout).await
    }

    /// Connect to `url`. In-memory databases live as long as their single
    /// connection, so that connection is never recycled.
    pub async fn connect_with(
        url: &str,
        max_connections: u32,
        connection_timeout: u64,
    ) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(connection_timeout));

        let pool_options = if Self::is_memory_url(url) {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            pool_options.max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        info!("Connected to database: {}", url);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the drink table if it does not exist yet
    pub async fn init_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_DRINK_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Drop every drink, recreate the table and insert the sample drink.
    pub async fn reset(&self) -> Result<(), DatabaseError> {
        warn!("Dropping and recreating the drink table");

        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS drink")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_DRINK_TABLE).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO drink (title, recipe) VALUES (?, ?)")
            .bind(SEED_TITLE)
            .bind(SEED_RECIPE)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Drink table reset with seed drink '{}'", SEED_TITLE);
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }

    fn is_memory_url(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}
