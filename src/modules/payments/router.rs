use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    create_payment, delete_payment, fail_payment, get_invoice, get_payment, get_payment_stats,
    get_payments, process_payment, refund_payment,
};

pub fn init_payments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_payments).post(create_payment))
        .route("/stats", get(get_payment_stats))
        .route("/{id}", get(get_payment).delete(delete_payment))
        .route("/{id}/process", put(process_payment))
        .route("/{id}/fail", put(fail_payment))
        .route("/{id}/refund", put(refund_payment))
        .route("/{id}/invoice", get(get_invoice))
}
