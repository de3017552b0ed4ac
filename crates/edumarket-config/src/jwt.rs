use std::env;

use crate::env_or;

pub const DEFAULT_SECRET: &str = "default-secret-key-change-in-production";
pub const DEFAULT_ISSUER: &str = "educational-platform-api";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in hours.
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SECRET.to_string()),
            expiration_hours: env_or("JWT_EXPIRATION_HOURS", 24),
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
        }
    }

    pub fn expiration_seconds(&self) -> i64 {
        self.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = JwtConfig::default();
        assert_eq!(config.secret, DEFAULT_SECRET);
        assert_eq!(config.expiration_hours, 24);
        assert_eq!(config.issuer, DEFAULT_ISSUER);
    }

    #[test]
    fn test_expiration_seconds() {
        let config = JwtConfig {
            expiration_hours: 2,
            ..JwtConfig::default()
        };
        assert_eq!(config.expiration_seconds(), 7200);
    }
}
