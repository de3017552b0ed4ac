//! Configuration modules for the Edumarket API.
//!
//! Re-exports the environment-driven configuration from `edumarket-config`
//! so handlers and tests can refer to `crate::config::*`.
//!
//! - [`cors`]: allowed browser origins (`ALLOWED_ORIGINS`)
//! - [`jwt`]: token signing (`JWT_SECRET`, `JWT_EXPIRATION_HOURS`, `JWT_ISSUER`)
//! - [`server`]: bind address (`HOST`, `PORT`, `METRICS_PORT`)

pub use edumarket_config::{CorsConfig, JwtConfig, ServerConfig, cors, jwt, server};
