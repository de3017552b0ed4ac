use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    create_report, delete_report, get_report, get_reports, reject_report, submit_report,
    update_report, validate_report,
};

pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_reports).post(create_report))
        .route(
            "/{id}",
            get(get_report).put(update_report).delete(delete_report),
        )
        .route("/{id}/submit", put(submit_report))
        .route("/{id}/validate", put(validate_report))
        .route("/{id}/reject", put(reject_report))
}
