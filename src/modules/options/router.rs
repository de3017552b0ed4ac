use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    accept_option, cancel_option, create_option, decline_option, delete_option, expire_option,
    get_expiring_options, get_option, get_options, get_pending_options, reject_option,
    update_option,
};

pub fn init_options_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_options).post(create_option))
        .route("/pending", get(get_pending_options))
        .route("/expiring", get(get_expiring_options))
        .route(
            "/{id}",
            get(get_option).put(update_option).delete(delete_option),
        )
        .route("/{id}/accept", put(accept_option))
        .route("/{id}/decline", put(decline_option))
        .route("/{id}/cancel", put(cancel_option))
        .route("/{id}/reject", put(reject_option))
        .route("/{id}/expire", put(expire_option))
}
