use crate::metrics::track_transition;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::offers::model::{
    CreateOfferDto, Offer, OfferDetails, OfferFilterParams, UpdateOfferDto,
};
use crate::modules::offers::service::OfferService;
use crate::modules::options::model::TeachingOption;
use crate::modules::options::service::OptionService;
use crate::modules::users::model::{User, UserRole};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::validator::{QueryParams, ValidatedJson};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/v1/offers",
    params(OfferFilterParams),
    responses(
        (status = 200, description = "Offers matching the filters", body = Vec<Offer>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn get_offers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(filters): QueryParams<OfferFilterParams>,
) -> Result<Json<Vec<Offer>>, AppError> {
    let offers = OfferService::list_offers(&state.db, &filters).await?;
    Ok(Json(offers))
}

#[utoipa::path(
    get,
    path = "/api/v1/offers/search",
    params(OfferFilterParams),
    responses(
        (status = 200, description = "Offers matching the filters", body = Vec<Offer>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn search_offers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    QueryParams(filters): QueryParams<OfferFilterParams>,
) -> Result<Json<Vec<Offer>>, AppError> {
    let offers = OfferService::list_offers(&state.db, &filters).await?;
    Ok(Json(offers))
}

#[utoipa::path(
    get,
    path = "/api/v1/offers/active",
    responses(
        (status = 200, description = "Open offers", body = Vec<Offer>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn get_active_offers(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> Result<Json<Vec<Offer>>, AppError> {
    let offers = OfferService::list_open(&state.db).await?;
    Ok(Json(offers))
}

/// Create a draft offer (administrators only)
#[utoipa::path(
    post,
    path = "/api/v1/offers",
    request_body = CreateOfferDto,
    responses(
        (status = 201, description = "Offer created as a draft", body = Offer),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state, dto))]
pub async fn create_offer(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateOfferDto>,
) -> Result<(StatusCode, Json<Offer>), AppError> {
    let offer = OfferService::create_offer(&state.db, admin.user_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

#[utoipa::path(
    get,
    path = "/api/v1/offers/{id}",
    params(("id" = i64, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer with its options", body = OfferDetails),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn get_offer(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<OfferDetails>, AppError> {
    let details = OfferService::get_details(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/v1/offers/{id}",
    params(("id" = i64, Path, description = "Offer ID")),
    request_body = UpdateOfferDto,
    responses(
        (status = 200, description = "Offer updated", body = Offer),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state, dto))]
pub async fn update_offer(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
    ValidatedJson(dto): ValidatedJson<UpdateOfferDto>,
) -> Result<Json<Offer>, AppError> {
    let offer = OfferService::update_offer(&state.db, id, dto).await?;
    Ok(Json(offer))
}

#[utoipa::path(
    delete,
    path = "/api/v1/offers/{id}",
    params(("id" = i64, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn delete_offer(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    OfferService::delete_offer(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Offer deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/v1/offers/{id}/publish",
    params(("id" = i64, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer opened", body = Offer),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn publish_offer(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<Offer>, AppError> {
    let mut offer = OfferService::get_offer(&state.db, id).await?;
    offer.publish(Utc::now());
    let offer = OfferService::save_state(&state.db, &offer).await?;
    track_transition("offer", "open");
    Ok(Json(offer))
}

#[utoipa::path(
    put,
    path = "/api/v1/offers/{id}/close",
    params(("id" = i64, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer closed", body = Offer),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn close_offer(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<Offer>, AppError> {
    let mut offer = OfferService::get_offer(&state.db, id).await?;
    offer.close();
    let offer = OfferService::save_state(&state.db, &offer).await?;
    track_transition("offer", "closed");
    Ok(Json(offer))
}

#[utoipa::path(
    put,
    path = "/api/v1/offers/{id}/fill",
    params(("id" = i64, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Offer filled", body = Offer),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn fill_offer(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<Offer>, AppError> {
    let mut offer = OfferService::get_offer(&state.db, id).await?;
    offer.fill();
    let offer = OfferService::save_state(&state.db, &offer).await?;
    track_transition("offer", "filled");
    Ok(Json(offer))
}

/// Register the calling enseignant's interest in an offer
#[utoipa::path(
    post,
    path = "/api/v1/offers/{id}/apply",
    params(("id" = i64, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Application recorded", body = MessageResponse),
        (status = 403, description = "Forbidden - enseignants only", body = ErrorResponse),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn apply_to_offer(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    if !auth_user.has_role(UserRole::Enseignant) {
        return Err(AppError::forbidden(
            "Only enseignants can apply to offers".to_string(),
        ));
    }

    OfferService::apply(&state.db, id, auth_user.user_id()).await?;
    Ok(Json(MessageResponse::new("Application recorded")))
}

#[utoipa::path(
    get,
    path = "/api/v1/offers/{id}/options",
    params(("id" = i64, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Options placed on the offer", body = Vec<TeachingOption>),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn get_offer_options(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<TeachingOption>>, AppError> {
    OfferService::get_offer(&state.db, id).await?;
    let options = OptionService::list_for_offer(&state.db, id).await?;
    Ok(Json(options))
}

#[utoipa::path(
    get,
    path = "/api/v1/offers/{id}/applicants",
    params(("id" = i64, Path, description = "Offer ID")),
    responses(
        (status = 200, description = "Enseignants who applied", body = Vec<User>),
        (status = 404, description = "Offer not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Offers"
)]
#[instrument(skip(state))]
pub async fn get_offer_applicants(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Vec<User>>, AppError> {
    let applicants = OfferService::list_applicants(&state.db, id).await?;
    Ok(Json(applicants))
}
