use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::state::AppState;
use crate::utils::errors::AppError;
use edumarket_auth::{Claims, verify_token};
use edumarket_models::UserRole;

/// Extractor that validates the bearer token and exposes the caller's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.0.user_id
    }

    /// The caller's role. A token carrying an unknown role is rejected.
    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid role in token".to_string()))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role(), Ok(UserRole::Administrator))
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        matches!(self.role(), Ok(r) if r == role)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::unauthorized("Missing or invalid authorization header".to_string())
                })?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(user_id: i64, role: &str) -> Claims {
        Claims {
            sub: user_id.to_string(),
            user_id,
            role: role.to_string(),
            iss: "test".to_string(),
            exp: 9999999999,
            iat: 1234567890,
            nbf: 1234567890,
        }
    }

    #[test]
    fn test_user_id() {
        assert_eq!(AuthUser(claims(12, "famille")).user_id(), 12);
    }

    #[test]
    fn test_role_parsing() {
        let auth_user = AuthUser(claims(1, "enseignant"));
        assert_eq!(auth_user.role().unwrap(), UserRole::Enseignant);
        assert!(auth_user.has_role(UserRole::Enseignant));
        assert!(!auth_user.is_admin());
    }

    #[test]
    fn test_admin() {
        assert!(AuthUser(claims(1, "administrator")).is_admin());
    }

    #[test]
    fn test_unknown_role_is_unauthorized() {
        let auth_user = AuthUser(claims(1, "system_admin"));
        assert_eq!(auth_user.role().unwrap_err().status.as_u16(), 401);
        assert!(!auth_user.is_admin());
    }
}
