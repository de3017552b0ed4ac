use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    create_mission, delete_mission, extend_mission, get_family_missions, get_mission,
    get_mission_courses, get_mission_payments, get_mission_reports, get_missions, stop_mission,
    update_mission,
};

pub fn init_missions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_missions).post(create_mission))
        .route(
            "/{id}",
            get(get_mission).put(update_mission).delete(delete_mission),
        )
        .route("/{id}/stop", put(stop_mission))
        .route("/{id}/extend", put(extend_mission))
        .route("/{id}/courses", get(get_mission_courses))
        .route("/{id}/reports", get(get_mission_reports))
        .route("/{id}/payments", get(get_mission_payments))
}

/// Mounted at `/family`.
pub fn init_family_router() -> Router<AppState> {
    Router::new().route("/missions", get(get_family_missions))
}
