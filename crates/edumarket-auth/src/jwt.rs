//! Token issue and verification.
//!
//! Tokens are signed with the shared secret from [`JwtConfig`] and carry the
//! configured issuer, which is checked on verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use edumarket_config::JwtConfig;
use edumarket_core::AppError;

use crate::claims::Claims;

/// Creates an access token for `user_id` with the given role name.
///
/// # Errors
///
/// Returns a 500 error if encoding fails.
pub fn create_access_token(
    user_id: i64,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.expiration_seconds().max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        user_id,
        role: role.to_string(),
        iss: jwt_config.issuer.clone(),
        exp,
        iat: now,
        nbf: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature, expiry and issuer, and returns the embedded claims.
///
/// # Errors
///
/// Returns a 401 error for any invalid, expired or foreign token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[jwt_config.issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}

/// Re-validates `token` and issues a fresh one for the same user and role.
pub fn refresh_access_token(token: &str, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let claims = verify_token(token, jwt_config)?;
    create_access_token(claims.user_id, &claims.role, jwt_config)
}
