//! Role-based authorization for Axum
//!
//! Three approaches, matching how a route is protected:
//! 1. Layer-based middleware ([`require_admin`]) for whole routers
//! 2. Extractors ([`RequireAdmin`], [`RequireEnseignant`], [`RequireFamille`])
//!    for single handlers
//! 3. Helper functions for ownership checks that need the target entity

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use edumarket_models::UserRole;

/// Middleware that lets the request through only when the caller has one of
/// `allowed_roles`.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&auth_user, allowed_roles)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Administrator-only routes.
///
/// ```rust,ignore
/// let admin_routes = init_admin_users_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[UserRole::Administrator]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

macro_rules! require_role_extractor {
    ($name:ident, [$($role:expr),+], $message:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = AuthUser::from_request_parts(parts, state).await?;
                let role = auth_user.role()?;

                if ![$($role),+].contains(&role) {
                    return Err(AppError::forbidden($message.to_string()));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_role_extractor!(
    RequireAdmin,
    [UserRole::Administrator],
    "Access denied. Administrator privileges required."
);
require_role_extractor!(
    RequireEnseignant,
    [UserRole::Enseignant, UserRole::Administrator],
    "Access denied. Enseignant privileges required."
);
require_role_extractor!(
    RequireFamille,
    [UserRole::Famille, UserRole::Administrator],
    "Access denied. Famille privileges required."
);

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    let user_role = auth_user.role()?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, user_role
        )));
    }

    Ok(())
}

/// Passes when the caller is `owner_id` or an administrator.
pub fn ensure_self_or_admin(auth_user: &AuthUser, owner_id: i64) -> Result<(), AppError> {
    if auth_user.is_admin() || auth_user.user_id() == owner_id {
        return Ok(());
    }
    Err(AppError::forbidden(
        "Access denied. You can only access your own resources.".to_string(),
    ))
}

/// Passes when the caller is one of `participant_ids` or an administrator.
pub fn ensure_participant_or_admin(
    auth_user: &AuthUser,
    participant_ids: &[i64],
) -> Result<(), AppError> {
    if auth_user.is_admin() || participant_ids.contains(&auth_user.user_id()) {
        return Ok(());
    }
    Err(AppError::forbidden(
        "Access denied. You are not a participant of this resource.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edumarket_auth::Claims;

    fn auth(user_id: i64, role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: user_id.to_string(),
            user_id,
            role: role.to_string(),
            iss: "test".to_string(),
            exp: 9999999999,
            iat: 0,
            nbf: 0,
        })
    }

    #[test]
    fn test_check_any_role() {
        let famille = auth(1, "famille");
        assert!(check_any_role(&famille, &[UserRole::Famille]).is_ok());
        let err = check_any_role(&famille, &[UserRole::Administrator]).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[test]
    fn test_self_or_admin() {
        assert!(ensure_self_or_admin(&auth(5, "famille"), 5).is_ok());
        assert!(ensure_self_or_admin(&auth(5, "famille"), 6).is_err());
        assert!(ensure_self_or_admin(&auth(1, "administrator"), 6).is_ok());
    }

    #[test]
    fn test_participant_or_admin() {
        assert!(ensure_participant_or_admin(&auth(10, "famille"), &[10, 20]).is_ok());
        assert!(ensure_participant_or_admin(&auth(20, "enseignant"), &[10, 20]).is_ok());
        assert!(ensure_participant_or_admin(&auth(30, "enseignant"), &[10, 20]).is_err());
        assert!(ensure_participant_or_admin(&auth(1, "administrator"), &[10, 20]).is_ok());
    }
}
