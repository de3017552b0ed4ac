use crate::metrics::{track_mission_created, track_transition};
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireFamille, ensure_participant_or_admin};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::courses::model::Course;
use crate::modules::courses::service::CourseService;
use crate::modules::missions::model::{
    CreateMissionDto, ExtendMissionDto, Mission, MissionDetails, MissionFilterParams,
    UpdateMissionDto,
};
use crate::modules::missions::service::MissionService;
use crate::modules::payments::model::Payment;
use crate::modules::reports::model::Report;
use crate::modules::reports::service::ReportService;
use crate::modules::users::model::UserRole;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::utils::parties::resolve_parties;
use crate::validator::{QueryParams, ValidatedJson};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::instrument;

async fn owned_mission(
    state: &AppState,
    auth_user: &AuthUser,
    id: i64,
) -> Result<Mission, AppError> {
    let mission = MissionService::get_mission(&state.db, id).await?;
    ensure_participant_or_admin(auth_user, &[mission.famille_id, mission.enseignant_id])?;
    Ok(mission)
}

#[utoipa::path(
    get,
    path = "/api/v1/missions",
    params(MissionFilterParams),
    responses(
        (status = 200, description = "Missions matching the filters", body = Vec<Mission>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state))]
pub async fn get_missions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(filters): QueryParams<MissionFilterParams>,
) -> Result<Json<Vec<Mission>>, AppError> {
    let missions = MissionService::list_missions(&state.db, &filters).await?;
    Ok(Json(missions))
}

/// Create a mission between a famille and an enseignant
///
/// A famille always creates for itself. An enseignant must be the mission's
/// teacher and name the famille. An administrator names both parties.
#[utoipa::path(
    post,
    path = "/api/v1/missions",
    request_body = CreateMissionDto,
    responses(
        (status = 201, description = "Mission created", body = Mission),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Famille or enseignant not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state, dto))]
pub async fn create_mission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateMissionDto>,
) -> Result<(StatusCode, Json<Mission>), AppError> {
    let (famille_id, enseignant_id) = resolve_parties(&auth_user, dto.famille_id, dto.enseignant_id)?;
    UserService::find_user_with_role(&state.db, famille_id, UserRole::Famille).await?;
    UserService::find_user_with_role(&state.db, enseignant_id, UserRole::Enseignant).await?;

    let mission = MissionService::create_mission(&state.db, famille_id, enseignant_id, dto).await?;
    track_mission_created();

    Ok((StatusCode::CREATED, Json(mission)))
}

#[utoipa::path(
    get,
    path = "/api/v1/missions/{id}",
    params(("id" = i64, Path, description = "Mission ID")),
    responses(
        (status = 200, description = "Mission with its courses and reports", body = MissionDetails),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state))]
pub async fn get_mission(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<MissionDetails>, AppError> {
    let details = MissionService::get_details(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/v1/missions/{id}",
    params(("id" = i64, Path, description = "Mission ID")),
    request_body = UpdateMissionDto,
    responses(
        (status = 200, description = "Mission updated", body = Mission),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state, dto))]
pub async fn update_mission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateMissionDto>,
) -> Result<Json<Mission>, AppError> {
    owned_mission(&state, &auth_user, id).await?;
    let mission = MissionService::update_mission(&state.db, id, dto).await?;
    Ok(Json(mission))
}

#[utoipa::path(
    delete,
    path = "/api/v1/missions/{id}",
    params(("id" = i64, Path, description = "Mission ID")),
    responses(
        (status = 204, description = "Mission deleted"),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state))]
pub async fn delete_mission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, AppError> {
    owned_mission(&state, &auth_user, id).await?;
    MissionService::delete_mission(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stop a mission: status `stopped`, end date now
#[utoipa::path(
    put,
    path = "/api/v1/missions/{id}/stop",
    params(("id" = i64, Path, description = "Mission ID")),
    responses(
        (status = 200, description = "Mission stopped", body = Mission),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state))]
pub async fn stop_mission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Mission>, AppError> {
    let mut mission = owned_mission(&state, &auth_user, id).await?;
    mission.stop(Utc::now());
    let mission = MissionService::save_state(&state.db, &mission).await?;
    track_transition("mission", "stopped");
    Ok(Json(mission))
}

/// Extend a mission: new end date, status back to `active`
#[utoipa::path(
    put,
    path = "/api/v1/missions/{id}/extend",
    params(("id" = i64, Path, description = "Mission ID")),
    request_body = ExtendMissionDto,
    responses(
        (status = 200, description = "Mission extended", body = Mission),
        (status = 400, description = "Missing end_date", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state, dto))]
pub async fn extend_mission(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<ExtendMissionDto>,
) -> Result<Json<Mission>, AppError> {
    let mut mission = owned_mission(&state, &auth_user, id).await?;
    mission.extend(dto.end_date);
    let mission = MissionService::save_state(&state.db, &mission).await?;
    track_transition("mission", "active");
    Ok(Json(mission))
}

#[utoipa::path(
    get,
    path = "/api/v1/missions/{id}/courses",
    params(("id" = i64, Path, description = "Mission ID")),
    responses(
        (status = 200, description = "Courses of the mission", body = Vec<Course>),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state))]
pub async fn get_mission_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Course>>, AppError> {
    MissionService::get_mission(&state.db, id).await?;
    let courses = CourseService::list_for_mission(&state.db, id).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/v1/missions/{id}/reports",
    params(("id" = i64, Path, description = "Mission ID")),
    responses(
        (status = 200, description = "Reports of the mission", body = Vec<Report>),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state))]
pub async fn get_mission_reports(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Report>>, AppError> {
    MissionService::get_mission(&state.db, id).await?;
    let reports = ReportService::list_for_mission(&state.db, id).await?;
    Ok(Json(reports))
}

#[utoipa::path(
    get,
    path = "/api/v1/missions/{id}/payments",
    params(("id" = i64, Path, description = "Mission ID")),
    responses(
        (status = 200, description = "Payments attached to the mission's courses", body = Vec<Payment>),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state))]
pub async fn get_mission_payments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = MissionService::list_payments(&state.db, id).await?;
    Ok(Json(payments))
}

/// The calling famille's missions; administrators see every mission
#[utoipa::path(
    get,
    path = "/api/v1/family/missions",
    responses(
        (status = 200, description = "Missions of the caller", body = Vec<Mission>),
        (status = 403, description = "Forbidden - familles only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Missions"
)]
#[instrument(skip(state))]
pub async fn get_family_missions(
    State(state): State<AppState>,
    RequireFamille(auth_user): RequireFamille,
) -> Result<Json<Vec<Mission>>, AppError> {
    let missions = if auth_user.is_admin() {
        MissionService::list_missions(&state.db, &MissionFilterParams::default()).await?
    } else {
        MissionService::list_for_famille(&state.db, auth_user.user_id()).await?
    };
    Ok(Json(missions))
}
