//! # Edumarket Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret, lifetime and issuer
//! - [`cors`]: allowed browser origins
//! - [`server`]: bind address and metrics port
//!
//! # Example
//!
//! ```ignore
//! use edumarket_config::{CorsConfig, JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Reads an environment variable and parses it, falling back to `default`
/// when the variable is unset or unparsable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
