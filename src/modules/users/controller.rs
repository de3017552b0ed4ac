use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, ensure_self_or_admin};
use crate::modules::addresses::model::Address;
use crate::modules::addresses::service::AddressService;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::payments::model::Payment;
use crate::modules::payments::service::PaymentService;
use crate::modules::resources::model::Resource;
use crate::modules::resources::service::ResourceService;
use crate::modules::users::model::{UpdateUserDto, User, UserFilterParams, UserResponse};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::validator::{QueryParams, ValidatedJson};
use axum::{Json, extract::State};
use tracing::instrument;

/// List users (administrators only)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    QueryParams(filters): QueryParams<UserFilterParams>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::list_users(&state.db, &filters).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with profile", body = UserResponse),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<UserResponse>, AppError> {
    ensure_self_or_admin(&auth_user, id)?;
    let user = UserService::get_user_response(&state.db, id).await?;
    Ok(Json(user))
}

/// Partially update a user (administrators only)
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email or username already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update_user(&state.db, id, dto).await?;
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    UserService::delete_user(&state.db, id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/addresses",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Addresses of the user", body = Vec<Address>),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user_addresses(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Address>>, AppError> {
    ensure_self_or_admin(&auth_user, id)?;
    UserService::find_user(&state.db, id).await?;
    let addresses = AddressService::list_for_user(&state.db, id).await?;
    Ok(Json(addresses))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/payments",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Payments of the user", body = Vec<Payment>),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user_payments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Payment>>, AppError> {
    ensure_self_or_admin(&auth_user, id)?;
    UserService::find_user(&state.db, id).await?;
    let payments = PaymentService::list_for_user(&state.db, id).await?;
    Ok(Json(payments))
}

/// Resources visible to a user: public ones plus those shared with them
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/resources",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "Resources visible to the user", body = Vec<Resource>),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user_resources(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Resource>>, AppError> {
    ensure_self_or_admin(&auth_user, id)?;
    UserService::find_user(&state.db, id).await?;
    let resources = ResourceService::list_visible(&state.db, Some(id), None).await?;
    Ok(Json(resources))
}
