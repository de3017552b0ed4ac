use crate::metrics::{track_payment_processed, track_transition};
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, ensure_self_or_admin};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::MessageResponse;
use crate::modules::courses::service::CourseService;
use crate::modules::payments::model::{
    CreatePaymentDto, Invoice, Payment, PaymentFilterParams, PaymentStats,
};
use crate::modules::payments::service::PaymentService;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::id_path::IdPath;
use crate::validator::{QueryParams, ValidatedJson};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(PaymentFilterParams),
    responses(
        (status = 200, description = "Payments matching the filters", body = Vec<Payment>),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn get_payments(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    QueryParams(filters): QueryParams<PaymentFilterParams>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let payments = PaymentService::list_payments(&state.db, &filters).await?;
    Ok(Json(payments))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/stats",
    responses(
        (status = 200, description = "Payment totals", body = PaymentStats),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn get_payment_stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<PaymentStats>, AppError> {
    let stats = PaymentService::stats(&state.db).await?;
    Ok(Json(stats))
}

/// Record a pending payment for the caller, or for `user_id` when the caller is an administrator
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment created", body = Payment),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User or course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state, dto))]
pub async fn create_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePaymentDto>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let payer_id = dto.user_id.unwrap_or(auth_user.user_id());
    ensure_self_or_admin(&auth_user, payer_id)?;
    UserService::find_user(&state.db, payer_id).await?;
    if let Some(course_id) = dto.course_id {
        CourseService::get_course(&state.db, course_id).await?;
    }

    let payment = PaymentService::create_payment(&state.db, payer_id, dto).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn get_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Payment>, AppError> {
    let payment = PaymentService::get_payment(&state.db, id).await?;
    ensure_self_or_admin(&auth_user, payment.user_id)?;
    Ok(Json(payment))
}

#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<MessageResponse>, AppError> {
    PaymentService::delete_payment(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Payment deleted successfully")))
}

/// Mark a payment completed. No gateway is involved and the current status is not checked.
#[utoipa::path(
    put,
    path = "/api/v1/payments/{id}/process",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment completed", body = Payment),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn process_payment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Payment>, AppError> {
    let mut payment = PaymentService::get_payment(&state.db, id).await?;
    ensure_self_or_admin(&auth_user, payment.user_id)?;

    payment.process(Utc::now());
    let payment = PaymentService::save_state(&state.db, &payment).await?;
    track_payment_processed(payment.amount);

    Ok(Json(payment))
}

#[utoipa::path(
    put,
    path = "/api/v1/payments/{id}/fail",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment failed", body = Payment),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn fail_payment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<Payment>, AppError> {
    let mut payment = PaymentService::get_payment(&state.db, id).await?;
    payment.fail();
    let payment = PaymentService::save_state(&state.db, &payment).await?;
    track_transition("payment", "failed");
    Ok(Json(payment))
}

#[utoipa::path(
    put,
    path = "/api/v1/payments/{id}/refund",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment refunded", body = Payment),
        (status = 403, description = "Forbidden - administrators only", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn refund_payment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    IdPath(id): IdPath,
) -> Result<Json<Payment>, AppError> {
    let mut payment = PaymentService::get_payment(&state.db, id).await?;
    payment.refund();
    let payment = PaymentService::save_state(&state.db, &payment).await?;
    track_transition("payment", "refunded");
    Ok(Json(payment))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}/invoice",
    params(("id" = i64, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Invoice for the payment", body = Invoice),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
#[instrument(skip(state))]
pub async fn get_invoice(
    State(state): State<AppState>,
    auth_user: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Invoice>, AppError> {
    let payment = PaymentService::get_payment(&state.db, id).await?;
    ensure_self_or_admin(&auth_user, payment.user_id)?;
    Ok(Json(payment.invoice(Utc::now())))
}
