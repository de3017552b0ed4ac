use crate::metrics::track_transition;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, ensure_self_or_admin};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::missions::service::MissionService;
use crate::modules::reports::model::{
    CreateReportDto, Report, ReportFilterParams, ReviewReportDto, UpdateReportDto,
};
use crate::modules::reports::service::ReportService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::validator::{OptionalJson, QueryParams, ValidatedJson};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::instrument;

async fn owned_report(state: &AppState, auth_user: &AuthUser, id: i64) -> Result<Report, AppError> {
    let report = ReportService::get_report(&state.db, id).await?;
    ensure_self_or_admin(auth_user, report.enseignant_id)?;
    Ok(report)
}

#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ReportFilterParams),
    responses(
        (status = 200, description = "Reports matching the filters", body = Vec<Report>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn get_reports(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(filters): QueryParams<ReportFilterParams>,
) -> Result<Json<Vec<Report>>, AppError> {
    let reports = ReportService::list_reports(&state.db, &filters).await?;
    Ok(Json(reports))
}

/// Write a report on a mission. Only the mission's enseignant or an administrator may.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = Report),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Caller is not the mission's enseignant", body = ErrorResponse),
        (status = 404, description = "Mission not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, dto))]
pub async fn create_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateReportDto>,
) -> Result<(StatusCode, Json<Report>), AppError> {
    let mission = MissionService::get_mission(&state.db, dto.mission_id).await?;
    ensure_self_or_admin(&auth_user, mission.enseignant_id)?;

    let report =
        ReportService::create_report(&state.db, mission.id, mission.enseignant_id, &dto.content)
            .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = Report),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn get_report(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Report>, AppError> {
    let report = ReportService::get_report(&state.db, id).await?;
    Ok(Json(report))
}

#[utoipa::path(
    put,
    path = "/api/v1/reports/{id}",
    params(("id" = i64, Path, description = "Report ID")),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = Report),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, dto))]
pub async fn update_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateReportDto>,
) -> Result<Json<Report>, AppError> {
    owned_report(&state, &auth_user, id).await?;
    let report = ReportService::update_report(&state.db, id, dto).await?;
    Ok(Json(report))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reports/{id}",
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn delete_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    owned_report(&state, &auth_user, id).await?;
    ReportService::delete_report(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Report deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/v1/reports/{id}/submit",
    params(("id" = i64, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report submitted", body = Report),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn submit_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Report>, AppError> {
    let mut report = owned_report(&state, &auth_user, id).await?;
    report.submit(Utc::now());
    let report = ReportService::save_state(&state.db, &report).await?;
    track_transition("report", "submitted");
    Ok(Json(report))
}

#[utoipa::path(
    put,
    path = "/api/v1/reports/{id}/validate",
    params(("id" = i64, Path, description = "Report ID")),
    request_body(content = ReviewReportDto, description = "Optional reviewer comments"),
    responses(
        (status = 200, description = "Report validated", body = Report),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, dto))]
pub async fn validate_report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath,
    OptionalJson(dto): OptionalJson<ReviewReportDto>,
) -> Result<Json<Report>, AppError> {
    let mut report = ReportService::get_report(&state.db, id).await?;
    report.validate_by(admin.user_id(), Utc::now(), dto.comments);
    let report = ReportService::save_state(&state.db, &report).await?;
    track_transition("report", "validated");
    Ok(Json(report))
}

#[utoipa::path(
    put,
    path = "/api/v1/reports/{id}/reject",
    params(("id" = i64, Path, description = "Report ID")),
    request_body(content = ReviewReportDto, description = "Optional reviewer comments"),
    responses(
        (status = 200, description = "Report rejected", body = Report),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, dto))]
pub async fn reject_report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath,
    OptionalJson(dto): OptionalJson<ReviewReportDto>,
) -> Result<Json<Report>, AppError> {
    let mut report = ReportService::get_report(&state.db, id).await?;
    report.reject_by(admin.user_id(), Utc::now(), dto.comments);
    let report = ReportService::save_state(&state.db, &report).await?;
    track_transition("report", "rejected");
    Ok(Json(report))
}
