use crate::metrics::track_transition;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireEnseignant, ensure_participant_or_admin};
use crate::modules::addresses::service::AddressService;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::courses::model::{
    Course, CourseDetails, CourseFilterParams, CreateCourseDto, DeclareCourseDto, NewCourse,
    ScheduleCourseDto, UpdateCourseDto,
};
use crate::modules::courses::service::CourseService;
use crate::modules::missions::service::MissionService;
use crate::modules::payments::model::Payment;
use crate::modules::payments::service::PaymentService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::validator::{OptionalJson, QueryParams, ValidatedJson};
use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

async fn owned_course(state: &AppState, auth_user: &AuthUser, id: i64) -> Result<Course, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    ensure_participant_or_admin(auth_user, &[course.famille_id, course.enseignant_id])?;
    Ok(course)
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(CourseFilterParams),
    responses(
        (status = 200, description = "Courses matching the filters", body = Vec<Course>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_courses(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(filters): QueryParams<CourseFilterParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::list_courses(&state.db, &filters).await?;
    Ok(Json(courses))
}

/// Schedule a course inside a mission. The parties are copied from the mission.
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Caller is not a party of the mission", body = ErrorResponse),
        (status = 404, description = "Mission or address not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn create_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let mission = MissionService::get_mission(&state.db, dto.mission_id).await?;
    ensure_participant_or_admin(&auth_user, &[mission.famille_id, mission.enseignant_id])?;
    if let Some(address_id) = dto.address_id {
        AddressService::ensure_exists(&state.db, address_id).await?;
    }

    let course = CourseService::create_course(&state.db, NewCourse::for_mission(&mission, dto)).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with its payments", body = CourseDetails),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<CourseDetails>, AppError> {
    let details = CourseService::get_details(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course or address not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn update_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    owned_course(&state, &auth_user, id).await?;
    if let Some(address_id) = dto.address_id {
        AddressService::ensure_exists(&state.db, address_id).await?;
    }

    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    owned_course(&state, &auth_user, id).await?;
    CourseService::delete_course(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

/// Put a course back to `scheduled`, optionally moving it
#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}/schedule",
    params(("id" = i64, Path, description = "Course ID")),
    request_body(content = ScheduleCourseDto, description = "Optional new time"),
    responses(
        (status = 200, description = "Course scheduled", body = Course),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn schedule_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    OptionalJson(dto): OptionalJson<ScheduleCourseDto>,
) -> Result<Json<Course>, AppError> {
    let mut course = owned_course(&state, &auth_user, id).await?;
    course.schedule(dto.scheduled_time);
    let course = CourseService::save_state(&state.db, &course).await?;
    track_transition("course", "scheduled");
    Ok(Json(course))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}/cancel",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course cancelled", body = Course),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn cancel_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Course>, AppError> {
    let mut course = owned_course(&state, &auth_user, id).await?;
    course.cancel();
    let course = CourseService::save_state(&state.db, &course).await?;
    track_transition("course", "cancelled");
    Ok(Json(course))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}/complete",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course completed", body = Course),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn complete_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Course>, AppError> {
    let mut course = owned_course(&state, &auth_user, id).await?;
    course.complete();
    let course = CourseService::save_state(&state.db, &course).await?;
    track_transition("course", "completed");
    Ok(Json(course))
}

/// Declare hours for a course. The course moves to `in_progress`; the hours are only validated.
#[utoipa::path(
    post,
    path = "/api/v1/courses/{id}/declare",
    params(("id" = i64, Path, description = "Course ID")),
    request_body = DeclareCourseDto,
    responses(
        (status = 200, description = "Hours declared", body = Course),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state, dto))]
pub async fn declare_course(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<DeclareCourseDto>,
) -> Result<Json<Course>, AppError> {
    let mut course = owned_course(&state, &auth_user, id).await?;
    tracing::info!(course_id = id, hours = dto.hours, "Course hours declared");
    course.declare();
    let course = CourseService::save_state(&state.db, &course).await?;
    track_transition("course", "in_progress");
    Ok(Json(course))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/payments",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Payments of the course", body = Vec<Payment>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course_payments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<Payment>>, AppError> {
    let course = CourseService::get_course(&state.db, id).await?;
    let payments = PaymentService::list_for_courses(&state.db, &[course.id]).await?;
    Ok(Json(payments))
}

/// The calling enseignant's courses; administrators see every course
#[utoipa::path(
    get,
    path = "/api/v1/teacher/courses",
    responses(
        (status = 200, description = "Courses of the caller", body = Vec<Course>),
        (status = 403, description = "Forbidden - enseignants only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_teacher_courses(
    State(state): State<AppState>,
    RequireEnseignant(auth_user): RequireEnseignant,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = if auth_user.is_admin() {
        CourseService::list_courses(&state.db, &CourseFilterParams::default()).await?
    } else {
        CourseService::list_for_enseignant(&state.db, auth_user.user_id()).await?
    };
    Ok(Json(courses))
}
