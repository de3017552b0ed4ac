use crate::metrics::track_transition;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::ensure_participant_or_admin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::offers::service::OfferService;
use crate::modules::options::model::{
    CreateOptionDto, OptionFilterParams, OptionStatus, TeachingOption, UpdateOptionDto,
};
use crate::modules::options::service::{NewOption, OptionService};
use crate::modules::users::model::UserRole;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::utils::parties::resolve_parties;
use crate::validator::{QueryParams, ValidatedJson};
use anyhow::anyhow;
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::instrument;

async fn owned_option(
    state: &AppState,
    auth_user: &AuthUser,
    id: i64,
) -> Result<TeachingOption, AppError> {
    let option = OptionService::get_option(&state.db, id).await?;
    ensure_participant_or_admin(auth_user, &[option.famille_id, option.enseignant_id])?;
    Ok(option)
}

/// Applies `transition` to an owned option and persists the new status.
async fn transition(
    state: &AppState,
    auth_user: &AuthUser,
    id: i64,
    apply: fn(&mut TeachingOption),
) -> Result<TeachingOption, AppError> {
    let mut option = owned_option(state, auth_user, id).await?;
    apply(&mut option);
    let option = OptionService::save_status(&state.db, &option).await?;
    track_transition("option", status_label(option.status));
    Ok(option)
}

fn status_label(status: OptionStatus) -> &'static str {
    match status {
        OptionStatus::Active => "active",
        OptionStatus::Accepted => "accepted",
        OptionStatus::Expired => "expired",
        OptionStatus::Cancelled => "cancelled",
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/options",
    params(OptionFilterParams),
    responses(
        (status = 200, description = "Options matching the filters", body = Vec<TeachingOption>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn get_options(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(filters): QueryParams<OptionFilterParams>,
) -> Result<Json<Vec<TeachingOption>>, AppError> {
    let options = OptionService::list_options(&state.db, &filters).await?;
    Ok(Json(options))
}

#[utoipa::path(
    get,
    path = "/api/v1/options/pending",
    responses(
        (status = 200, description = "Active options", body = Vec<TeachingOption>)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn get_pending_options(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<TeachingOption>>, AppError> {
    let options = OptionService::list_pending(&state.db).await?;
    Ok(Json(options))
}

/// Options expiring within the next 48 hours
#[utoipa::path(
    get,
    path = "/api/v1/options/expiring",
    responses(
        (status = 200, description = "Options close to expiry", body = Vec<TeachingOption>)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn get_expiring_options(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<TeachingOption>>, AppError> {
    let options = OptionService::list_expiring(&state.db, Utc::now()).await?;
    Ok(Json(options))
}

/// Reserve an enseignant for a famille
///
/// Parties resolve as for missions. Without an `expiration_date` the option
/// lasts seven days.
#[utoipa::path(
    post,
    path = "/api/v1/options",
    request_body = CreateOptionDto,
    responses(
        (status = 201, description = "Option created", body = TeachingOption),
        (status = 400, description = "Validation error or expiration before creation", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Famille, enseignant or offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state, dto))]
pub async fn create_option(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateOptionDto>,
) -> Result<(StatusCode, Json<TeachingOption>), AppError> {
    let (famille_id, enseignant_id) = resolve_parties(&auth_user, dto.famille_id, dto.enseignant_id)?;
    UserService::find_user_with_role(&state.db, famille_id, UserRole::Famille).await?;
    UserService::find_user_with_role(&state.db, enseignant_id, UserRole::Enseignant).await?;
    if let Some(offer_id) = dto.offer_id {
        OfferService::get_offer(&state.db, offer_id).await?;
    }

    let creation_date = Utc::now();
    let expiration_date = TeachingOption::resolve_expiration(creation_date, dto.expiration_date)?;

    let option = OptionService::create_option(
        &state.db,
        NewOption {
            creation_date,
            expiration_date,
            description: dto.description.unwrap_or_default(),
            enseignant_id,
            famille_id,
            offer_id: dto.offer_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(option)))
}

#[utoipa::path(
    get,
    path = "/api/v1/options/{id}",
    params(("id" = i64, Path, description = "Option ID")),
    responses(
        (status = 200, description = "Option", body = TeachingOption),
        (status = 404, description = "Option not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn get_option(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<TeachingOption>, AppError> {
    let option = OptionService::get_option(&state.db, id).await?;
    Ok(Json(option))
}

#[utoipa::path(
    put,
    path = "/api/v1/options/{id}",
    params(("id" = i64, Path, description = "Option ID")),
    request_body = UpdateOptionDto,
    responses(
        (status = 200, description = "Option updated", body = TeachingOption),
        (status = 400, description = "Expiration before creation", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state, dto))]
pub async fn update_option(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateOptionDto>,
) -> Result<Json<TeachingOption>, AppError> {
    let option = owned_option(&state, &auth_user, id).await?;
    if let Some(expiration_date) = dto.expiration_date
        && expiration_date < option.creation_date
    {
        return Err(AppError::bad_request(anyhow!(
            "expiration_date must not be earlier than the creation date"
        )));
    }

    let option = OptionService::update_option(&state.db, id, dto).await?;
    Ok(Json(option))
}

#[utoipa::path(
    delete,
    path = "/api/v1/options/{id}",
    params(("id" = i64, Path, description = "Option ID")),
    responses(
        (status = 200, description = "Option deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn delete_option(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    owned_option(&state, &auth_user, id).await?;
    OptionService::delete_option(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Option deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/v1/options/{id}/accept",
    params(("id" = i64, Path, description = "Option ID")),
    responses(
        (status = 200, description = "Option accepted", body = TeachingOption),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn accept_option(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<TeachingOption>, AppError> {
    let option = transition(&state, &auth_user, id, TeachingOption::accept).await?;
    Ok(Json(option))
}

/// Decline an option. A declined option is stored as `expired`.
#[utoipa::path(
    put,
    path = "/api/v1/options/{id}/decline",
    params(("id" = i64, Path, description = "Option ID")),
    responses(
        (status = 200, description = "Option declined", body = TeachingOption),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn decline_option(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<TeachingOption>, AppError> {
    let option = transition(&state, &auth_user, id, TeachingOption::decline).await?;
    Ok(Json(option))
}

#[utoipa::path(
    put,
    path = "/api/v1/options/{id}/cancel",
    params(("id" = i64, Path, description = "Option ID")),
    responses(
        (status = 200, description = "Option cancelled", body = TeachingOption),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn cancel_option(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<TeachingOption>, AppError> {
    let option = transition(&state, &auth_user, id, TeachingOption::cancel).await?;
    Ok(Json(option))
}

#[utoipa::path(
    put,
    path = "/api/v1/options/{id}/reject",
    params(("id" = i64, Path, description = "Option ID")),
    responses(
        (status = 200, description = "Option rejected", body = TeachingOption),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn reject_option(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<TeachingOption>, AppError> {
    let option = transition(&state, &auth_user, id, TeachingOption::reject).await?;
    Ok(Json(option))
}

#[utoipa::path(
    put,
    path = "/api/v1/options/{id}/expire",
    params(("id" = i64, Path, description = "Option ID")),
    responses(
        (status = 200, description = "Option expired", body = TeachingOption),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Option not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Options"
)]
#[instrument(skip(state))]
pub async fn expire_option(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<TeachingOption>, AppError> {
    let option = transition(&state, &auth_user, id, TeachingOption::expire).await?;
    Ok(Json(option))
}
