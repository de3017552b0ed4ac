use sqlx::PgPool;

use crate::config::{CorsConfig, JwtConfig};

/// Shared state handed to every handler. The pool is owned by the
/// composition root; nothing else keeps a database handle.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            db,
            jwt_config,
            cors_config,
        }
    }

    /// Builds the state around an open pool, reading the rest from the environment.
    pub fn from_env(db: PgPool) -> Self {
        Self::new(db, JwtConfig::from_env(), CorsConfig::from_env())
    }
}
