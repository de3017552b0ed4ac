//! Authentication DTOs.
//!
//! Registration, login and token refresh all answer with an
//! [`AuthResponse`]: a bearer token plus the account it belongs to.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::{UserResponse, UserRole};

/// Self-registration. Only `famille` and `enseignant` may register this way.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be between 3 and 50 characters"))]
    #[schema(example = "marie.martin")]
    pub username: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "marie@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    #[schema(example = "secret123")]
    pub password: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub family_name: Option<String>,
    pub specialization: Option<String>,
    pub qualifications: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "secret123")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "token is required"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_validation() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "username": "jo",
            "email": "not-an-email",
            "password": "123",
            "role": "famille"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let result: Result<RegisterRequest, _> = serde_json::from_value(json!({
            "username": "valid",
            "email": "a@b.com",
            "password": "123456",
            "role": "superuser"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_login_request_valid() {
        let request = LoginRequest {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
