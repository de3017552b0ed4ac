use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::{
    AuthResponse, ChangePasswordDto, LoginRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest, UpdateProfileDto, UserResponse,
};
use crate::modules::auth::service::AuthService;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Register a famille or enseignant account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Administrator self-registration refused", body = ErrorResponse),
        (status = 409, description = "Email or username already in use", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register(&state.db, dto, &state.jwt_config).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or deactivated account", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed", body = AuthResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::refresh(&state.db, &dto.token, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Tokens are stateless; logging out is the client discarding its token
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument]
pub async fn logout(_auth_user: AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Current user with profile", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_user_response(&state.db, auth_user.user_id()).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Email or username already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_user(&state.db, auth_user.user_id(), dto.into()).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Current password is incorrect", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::change_password(&state.db, auth_user.user_id(), dto).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
