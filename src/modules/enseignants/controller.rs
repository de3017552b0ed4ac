use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, ensure_self_or_admin};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::courses::model::Course;
use crate::modules::courses::service::CourseService;
use crate::modules::enseignants::model::{
    CreateEnseignantDto, EnseignantDetails, EnseignantFilterParams, EnseignantSummary,
    UpdateEnseignantDto,
};
use crate::modules::enseignants::service::EnseignantService;
use crate::modules::missions::model::Mission;
use crate::modules::missions::service::MissionService;
use crate::modules::options::model::TeachingOption;
use crate::modules::options::service::OptionService;
use crate::modules::payments::model::Payment;
use crate::modules::reports::model::Report;
use crate::modules::reports::service::ReportService;
use crate::modules::users::model::{User, UserResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::validator::{QueryParams, ValidatedJson};
use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/v1/enseignants",
    params(EnseignantFilterParams),
    responses(
        (status = 200, description = "Enseignants with their profile", body = Vec<EnseignantSummary>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_enseignants(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(filters): QueryParams<EnseignantFilterParams>,
) -> Result<Json<Vec<EnseignantSummary>>, AppError> {
    let enseignants = EnseignantService::list_enseignants(&state.db, &filters).await?;
    Ok(Json(enseignants))
}

/// Create an enseignant account (administrators only)
#[utoipa::path(
    post,
    path = "/api/v1/enseignants",
    request_body = CreateEnseignantDto,
    responses(
        (status = 201, description = "Enseignant created", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 409, description = "Email or username already in use", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state, dto))]
pub async fn create_enseignant(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateEnseignantDto>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let enseignant = EnseignantService::create_enseignant(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(enseignant)))
}

/// Nearby enseignants. No geolocation yet: returns every enseignant.
#[utoipa::path(
    get,
    path = "/api/v1/enseignants/nearby",
    responses(
        (status = 200, description = "Enseignants", body = Vec<EnseignantSummary>)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_nearby_enseignants(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<EnseignantSummary>>, AppError> {
    let enseignants =
        EnseignantService::list_enseignants(&state.db, &EnseignantFilterParams::default()).await?;
    Ok(Json(enseignants))
}

#[utoipa::path(
    get,
    path = "/api/v1/enseignants/{id}",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    responses(
        (status = 200, description = "Enseignant with missions, courses and reports", body = EnseignantDetails),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_enseignant(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<EnseignantDetails>, AppError> {
    let details = EnseignantService::get_details(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/v1/enseignants/{id}",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    request_body = UpdateEnseignantDto,
    responses(
        (status = 200, description = "Enseignant updated", body = UserResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state, dto))]
pub async fn update_enseignant(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateEnseignantDto>,
) -> Result<Json<UserResponse>, AppError> {
    ensure_self_or_admin(&auth_user, id)?;
    let enseignant = EnseignantService::update_enseignant(&state.db, id, dto).await?;
    Ok(Json(enseignant))
}

#[utoipa::path(
    delete,
    path = "/api/v1/enseignants/{id}",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    responses(
        (status = 200, description = "Enseignant deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn delete_enseignant(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    EnseignantService::delete_enseignant(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Enseignant deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/v1/enseignants/{id}/students",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    responses(
        (status = 200, description = "Distinct familles taught", body = Vec<User>),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_enseignant_students(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<User>>, AppError> {
    let students = EnseignantService::list_students(&state.db, id).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/v1/enseignants/{id}/missions",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    responses(
        (status = 200, description = "Missions of the enseignant", body = Vec<Mission>),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_enseignant_missions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Mission>>, AppError> {
    EnseignantService::find_enseignant(&state.db, id).await?;
    let missions = MissionService::list_for_enseignant(&state.db, id).await?;
    Ok(Json(missions))
}

#[utoipa::path(
    get,
    path = "/api/v1/enseignants/{id}/courses",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    responses(
        (status = 200, description = "Courses of the enseignant", body = Vec<Course>),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_enseignant_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Course>>, AppError> {
    EnseignantService::find_enseignant(&state.db, id).await?;
    let courses = CourseService::list_for_enseignant(&state.db, id).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/v1/enseignants/{id}/reports",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    responses(
        (status = 200, description = "Reports written by the enseignant", body = Vec<Report>),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_enseignant_reports(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Report>>, AppError> {
    EnseignantService::find_enseignant(&state.db, id).await?;
    let reports = ReportService::list_for_enseignant(&state.db, id).await?;
    Ok(Json(reports))
}

#[utoipa::path(
    get,
    path = "/api/v1/enseignants/{id}/options",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    responses(
        (status = 200, description = "Options on the enseignant", body = Vec<TeachingOption>),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_enseignant_options(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<TeachingOption>>, AppError> {
    EnseignantService::find_enseignant(&state.db, id).await?;
    let options = OptionService::list_for_enseignant(&state.db, id).await?;
    Ok(Json(options))
}

#[utoipa::path(
    get,
    path = "/api/v1/enseignants/{id}/payments",
    params(("id" = i64, Path, description = "Enseignant user ID")),
    responses(
        (status = 200, description = "Payments made by the enseignant", body = Vec<Payment>),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enseignants"
)]
#[instrument(skip(state))]
pub async fn get_enseignant_payments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Payment>>, AppError> {
    ensure_self_or_admin(&auth_user, id)?;
    let payments = EnseignantService::list_payments(&state.db, id).await?;
    Ok(Json(payments))
}
