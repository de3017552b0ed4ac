use sqlx::PgPool;
use tracing::instrument;

use crate::config::JwtConfig;
use crate::metrics::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};
use crate::modules::auth::model::{AuthResponse, LoginRequest, RegisterRequest};
use crate::modules::users::model::{UserResponse, UserRole};
use crate::modules::users::service::{NewAccount, UserService};
use crate::utils::errors::AppError;
use crate::utils::password::verify_password;
use edumarket_auth::{create_access_token, refresh_access_token, verify_token};

pub struct AuthService;

impl AuthService {
    /// Self-registration of a famille or enseignant account.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email, role = %dto.role))]
    pub async fn register(
        db: &PgPool,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        if dto.role == UserRole::Administrator {
            return Err(AppError::forbidden(
                "Administrator accounts cannot be self-registered".to_string(),
            ));
        }

        let role = dto.role;
        let user = UserService::create_account(
            db,
            NewAccount {
                username: dto.username,
                email: dto.email,
                password: dto.password,
                phone_number: dto.phone_number,
                role,
                family_name: dto.family_name.unwrap_or_default(),
                specialization: dto.specialization.unwrap_or_default(),
                qualifications: dto.qualifications.unwrap_or_default(),
            },
        )
        .await?;

        track_user_registered(role.as_str());

        Self::issue(user, jwt_config)
    }

    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let Some(record) = UserService::find_by_email_with_password(db, &dto.email).await? else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized("Invalid credentials".to_string()));
        };

        if !verify_password(&dto.password, &record.password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized("Invalid credentials".to_string()));
        }

        if !record.user.is_active {
            track_user_login_failure("inactive");
            return Err(AppError::unauthorized("Account is deactivated".to_string()));
        }

        track_user_login_success(record.user.role.as_str());

        let user = UserService::with_profile(db, record.user).await?;
        Self::issue(user, jwt_config)
    }

    /// Exchanges a valid token for a fresh one, re-reading the account so a
    /// deleted or deactivated user cannot refresh.
    #[instrument(skip(db, token, jwt_config))]
    pub async fn refresh(
        db: &PgPool,
        token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let claims = verify_token(token, jwt_config)?;

        let user = UserService::find_user(db, claims.user_id)
            .await
            .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))?;

        if !user.is_active {
            return Err(AppError::unauthorized("Account is deactivated".to_string()));
        }

        let token = refresh_access_token(token, jwt_config)?;
        track_jwt_issued();

        Ok(AuthResponse {
            token,
            expires_in: jwt_config.expiration_seconds(),
            user: UserService::with_profile(db, user).await?,
        })
    }

    fn issue(user: UserResponse, jwt_config: &JwtConfig) -> Result<AuthResponse, AppError> {
        let token = create_access_token(user.user.id, user.user.role.as_str(), jwt_config)?;
        track_jwt_issued();

        Ok(AuthResponse {
            token,
            expires_in: jwt_config.expiration_seconds(),
            user,
        })
    }
}
