use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::resources::model::{
    CreateResourceDto, Resource, ResourceFilterParams, ShareResourceDto, UpdateResourceDto,
};
use crate::modules::resources::service::ResourceService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::{IdPairPath, IdPath};
use crate::validator::{QueryParams, ValidatedJson};
use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

fn viewer(auth_user: &AuthUser) -> Option<i64> {
    (!auth_user.is_admin()).then(|| auth_user.user_id())
}

/// List the resources visible to the caller
#[utoipa::path(
    get,
    path = "/api/v1/resources",
    params(ResourceFilterParams),
    responses(
        (status = 200, description = "Visible resources", body = Vec<Resource>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_resources(
    State(state): State<AppState>,
    auth_user: AuthUser,
    QueryParams(filters): QueryParams<ResourceFilterParams>,
) -> Result<Json<Vec<Resource>>, AppError> {
    let resources =
        ResourceService::list_visible(&state.db, viewer(&auth_user), filters.resource_type)
            .await?;
    Ok(Json(resources))
}

#[utoipa::path(
    post,
    path = "/api/v1/resources",
    request_body = CreateResourceDto,
    responses(
        (status = 201, description = "Resource created", body = Resource),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, dto))]
pub async fn create_resource(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateResourceDto>,
) -> Result<(StatusCode, Json<Resource>), AppError> {
    let resource = ResourceService::create_resource(&state.db, admin.user_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

#[utoipa::path(
    get,
    path = "/api/v1/resources/{id}",
    params(("id" = i64, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource", body = Resource),
        (status = 404, description = "Resource not found or not visible", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn get_resource(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Resource>, AppError> {
    let resource = ResourceService::get_visible(&state.db, id, viewer(&auth_user)).await?;
    Ok(Json(resource))
}

#[utoipa::path(
    put,
    path = "/api/v1/resources/{id}",
    params(("id" = i64, Path, description = "Resource ID")),
    request_body = UpdateResourceDto,
    responses(
        (status = 200, description = "Resource updated", body = Resource),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, dto))]
pub async fn update_resource(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateResourceDto>,
) -> Result<Json<Resource>, AppError> {
    let resource = ResourceService::update_resource(&state.db, id, dto).await?;
    Ok(Json(resource))
}

#[utoipa::path(
    delete,
    path = "/api/v1/resources/{id}",
    params(("id" = i64, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn delete_resource(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    ResourceService::delete_resource(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Resource deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/v1/resources/{id}/share",
    params(("id" = i64, Path, description = "Resource ID")),
    request_body = ShareResourceDto,
    responses(
        (status = 200, description = "Resource shared", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Resource not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state, dto))]
pub async fn share_resource(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<ShareResourceDto>,
) -> Result<Json<MessageResponse>, AppError> {
    let shared = ResourceService::share(&state.db, id, &dto.user_ids).await?;
    Ok(Json(MessageResponse::new(format!(
        "Resource shared with {} user(s)",
        shared
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/resources/{id}/share/{user_id}",
    params(
        ("id" = i64, Path, description = "Resource ID"),
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Share removed", body = MessageResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Share not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Resources"
)]
#[instrument(skip(state))]
pub async fn unshare_resource(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPairPath(id, user_id): IdPairPath,
) -> Result<Json<MessageResponse>, AppError> {
    ResourceService::unshare(&state.db, id, user_id).await?;
    Ok(Json(MessageResponse::new("Resource unshared successfully")))
}
