use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, ensure_self_or_admin};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::courses::model::Course;
use crate::modules::courses::service::CourseService;
use crate::modules::familles::model::{FamilleDetails, FamilleSummary, UpdateFamilleDto};
use crate::modules::familles::service::FamilleService;
use crate::modules::missions::model::Mission;
use crate::modules::missions::service::MissionService;
use crate::modules::options::model::TeachingOption;
use crate::modules::options::service::OptionService;
use crate::modules::payments::model::Payment;
use crate::modules::payments::service::PaymentService;
use crate::modules::users::model::{User, UserResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::validator::ValidatedJson;
use axum::{Json, extract::State};
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/v1/familles",
    responses(
        (status = 200, description = "Familles with their profile", body = Vec<FamilleSummary>),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state))]
pub async fn get_familles(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<FamilleSummary>>, AppError> {
    let familles = FamilleService::list_familles(&state.db).await?;
    Ok(Json(familles))
}

#[utoipa::path(
    get,
    path = "/api/v1/familles/{id}",
    params(("id" = i64, Path, description = "Famille user ID")),
    responses(
        (status = 200, description = "Famille with missions, courses and options", body = FamilleDetails),
        (status = 404, description = "Famille not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state))]
pub async fn get_famille(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<FamilleDetails>, AppError> {
    let details = FamilleService::get_details(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/v1/familles/{id}",
    params(("id" = i64, Path, description = "Famille user ID")),
    request_body = UpdateFamilleDto,
    responses(
        (status = 200, description = "Famille updated", body = UserResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Famille not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state, dto))]
pub async fn update_famille(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateFamilleDto>,
) -> Result<Json<UserResponse>, AppError> {
    ensure_self_or_admin(&auth_user, id)?;
    let famille = FamilleService::update_famille(&state.db, id, dto).await?;
    Ok(Json(famille))
}

#[utoipa::path(
    delete,
    path = "/api/v1/familles/{id}",
    params(("id" = i64, Path, description = "Famille user ID")),
    responses(
        (status = 200, description = "Famille deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Famille not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state))]
pub async fn delete_famille(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    FamilleService::delete_famille(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Famille deleted successfully")))
}

/// Enseignants working with the famille through missions or courses
#[utoipa::path(
    get,
    path = "/api/v1/familles/{id}/teachers",
    params(("id" = i64, Path, description = "Famille user ID")),
    responses(
        (status = 200, description = "Distinct enseignants", body = Vec<User>),
        (status = 404, description = "Famille not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state))]
pub async fn get_famille_teachers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<User>>, AppError> {
    let teachers = FamilleService::list_teachers(&state.db, id).await?;
    Ok(Json(teachers))
}

#[utoipa::path(
    get,
    path = "/api/v1/familles/{id}/missions",
    params(("id" = i64, Path, description = "Famille user ID")),
    responses(
        (status = 200, description = "Missions of the famille", body = Vec<Mission>),
        (status = 404, description = "Famille not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state))]
pub async fn get_famille_missions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Mission>>, AppError> {
    FamilleService::find_famille(&state.db, id).await?;
    let missions = MissionService::list_for_famille(&state.db, id).await?;
    Ok(Json(missions))
}

#[utoipa::path(
    get,
    path = "/api/v1/familles/{id}/courses",
    params(("id" = i64, Path, description = "Famille user ID")),
    responses(
        (status = 200, description = "Courses of the famille", body = Vec<Course>),
        (status = 404, description = "Famille not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state))]
pub async fn get_famille_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Course>>, AppError> {
    FamilleService::find_famille(&state.db, id).await?;
    let courses = CourseService::list_for_famille(&state.db, id).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/v1/familles/{id}/options",
    params(("id" = i64, Path, description = "Famille user ID")),
    responses(
        (status = 200, description = "Options held by the famille", body = Vec<TeachingOption>),
        (status = 404, description = "Famille not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state))]
pub async fn get_famille_options(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<TeachingOption>>, AppError> {
    FamilleService::find_famille(&state.db, id).await?;
    let options = OptionService::list_for_famille(&state.db, id).await?;
    Ok(Json(options))
}

#[utoipa::path(
    get,
    path = "/api/v1/familles/{id}/payments",
    params(("id" = i64, Path, description = "Famille user ID")),
    responses(
        (status = 200, description = "Payments made by the famille", body = Vec<Payment>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Famille not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument(skip(state))]
pub async fn get_famille_payments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Payment>>, AppError> {
    ensure_self_or_admin(&auth_user, id)?;
    FamilleService::find_famille(&state.db, id).await?;
    let payments = PaymentService::list_for_user(&state.db, id).await?;
    Ok(Json(payments))
}

/// Reviews are not available yet
#[utoipa::path(
    post,
    path = "/api/v1/familles/{id}/reviews",
    params(("id" = i64, Path, description = "Famille user ID")),
    responses(
        (status = 501, description = "Not implemented", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Familles"
)]
#[instrument]
pub async fn create_famille_review(
    _auth_user: AuthUser,
    IdPath(_id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    Err(AppError::not_implemented(
        "Reviews are not implemented yet".to_string(),
    ))
}
