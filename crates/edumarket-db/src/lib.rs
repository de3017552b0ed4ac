//! # Edumarket DB
//!
//! PostgreSQL connection pool construction and embedded schema migrations.
//!
//! The pool is opened once by the composition root (`main`), stored in the
//! application state, and closed on shutdown. Nothing in the workspace holds
//! a process-wide database handle.
//!
//! # Example
//!
//! ```ignore
//! use edumarket_db::{DbConfig, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DbConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! ```

use std::env;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use sqlx::PgPool;

/// Migrations from the workspace `migrations/` directory, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Reads `DATABASE_URL` (required) and `DATABASE_MAX_CONNECTIONS` (default 10).
    pub fn from_env() -> Result<Self, env::VarError> {
        let url = env::var("DATABASE_URL")?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            url,
            max_connections,
            acquire_timeout: Duration::from_secs(5),
        })
    }
}

/// Opens a PostgreSQL connection pool.
///
/// The returned [`PgPool`] is cheaply cloneable and is meant to be placed in
/// the application state so every handler receives it explicitly.
pub async fn init_db_pool(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "Database connection pool established"
    );

    Ok(pool)
}

/// Applies pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
