use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_famille_review, delete_famille, get_famille, get_famille_courses,
    get_famille_missions, get_famille_options, get_famille_payments, get_famille_teachers,
    get_familles, update_famille,
};

pub fn init_familles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_familles))
        .route(
            "/{id}",
            get(get_famille).put(update_famille).delete(delete_famille),
        )
        .route("/{id}/teachers", get(get_famille_teachers))
        .route("/{id}/missions", get(get_famille_missions))
        .route("/{id}/courses", get(get_famille_courses))
        .route("/{id}/options", get(get_famille_options))
        .route("/{id}/payments", get(get_famille_payments))
        .route("/{id}/reviews", post(create_famille_review))
}
