use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, ensure_self_or_admin};
use crate::modules::addresses::model::{
    Address, CreateAddressDto, GeocodeQuery, GeocodeResponse, RouteQuery, RouteResponse,
    UpdateAddressDto,
};
use crate::modules::addresses::service::AddressService;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::validator::{QueryParams, ValidatedJson};
use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/v1/addresses",
    responses(
        (status = 200, description = "All addresses", body = Vec<Address>),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
#[instrument(skip(state))]
pub async fn get_addresses(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Address>>, AppError> {
    let addresses = AddressService::list_addresses(&state.db).await?;
    Ok(Json(addresses))
}

/// Create an address for the caller, or for `user_id` when the caller is an administrator
#[utoipa::path(
    post,
    path = "/api/v1/addresses",
    request_body = CreateAddressDto,
    responses(
        (status = 201, description = "Address created", body = Address),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
#[instrument(skip(state, dto))]
pub async fn create_address(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAddressDto>,
) -> Result<(StatusCode, Json<Address>), AppError> {
    let owner_id = dto.user_id.unwrap_or(auth_user.user_id());
    ensure_self_or_admin(&auth_user, owner_id)?;
    UserService::find_user(&state.db, owner_id).await?;

    let address = AddressService::create_address(&state.db, owner_id, dto).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses/geocode",
    params(GeocodeQuery),
    responses(
        (status = 200, description = "Placeholder coordinates", body = GeocodeResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
#[instrument]
pub async fn geocode(
    _auth_user: AuthUser,
    QueryParams(query): QueryParams<GeocodeQuery>,
) -> Json<GeocodeResponse> {
    Json(GeocodeResponse::placeholder(query.address))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses/route",
    params(RouteQuery),
    responses(
        (status = 200, description = "Placeholder route", body = RouteResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
#[instrument]
pub async fn calculate_route(
    _auth_user: AuthUser,
    QueryParams(query): QueryParams<RouteQuery>,
) -> Json<RouteResponse> {
    Json(RouteResponse::placeholder(query.from, query.to))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses/{id}",
    params(("id" = i64, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address", body = Address),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Address not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
#[instrument(skip(state))]
pub async fn get_address(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Address>, AppError> {
    let address = AddressService::get_address(&state.db, id).await?;
    ensure_self_or_admin(&auth_user, address.user_id)?;
    Ok(Json(address))
}

#[utoipa::path(
    put,
    path = "/api/v1/addresses/{id}",
    params(("id" = i64, Path, description = "Address ID")),
    request_body = UpdateAddressDto,
    responses(
        (status = 200, description = "Address updated", body = Address),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Address not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
#[instrument(skip(state, dto))]
pub async fn update_address(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateAddressDto>,
) -> Result<Json<Address>, AppError> {
    let address = AddressService::get_address(&state.db, id).await?;
    ensure_self_or_admin(&auth_user, address.user_id)?;

    let address = AddressService::update_address(&state.db, id, dto).await?;
    Ok(Json(address))
}

#[utoipa::path(
    delete,
    path = "/api/v1/addresses/{id}",
    params(("id" = i64, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Address not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Addresses"
)]
#[instrument(skip(state))]
pub async fn delete_address(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    let address = AddressService::get_address(&state.db, id).await?;
    ensure_self_or_admin(&auth_user, address.user_id)?;

    AddressService::delete_address(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Address deleted successfully")))
}
