use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    /// Explicit origins. Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        Self::parse(&env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()))
    }

    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if origins.iter().any(|o| o == "*") {
            return Self::allow_any();
        }

        Self {
            allowed_origins: origins,
        }
    }

    pub fn allow_any() -> Self {
        Self {
            allowed_origins: Vec::new(),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}
