use crate::state::AppState;
use axum::{Router, routing::get};

use super::controller::{
    create_enseignant, delete_enseignant, get_enseignant, get_enseignant_courses,
    get_enseignant_missions, get_enseignant_options, get_enseignant_payments,
    get_enseignant_reports, get_enseignant_students, get_enseignants, get_nearby_enseignants,
    update_enseignant,
};

pub fn init_enseignants_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_enseignants).post(create_enseignant))
        .route("/nearby", get(get_nearby_enseignants))
        .route(
            "/{id}",
            get(get_enseignant)
                .put(update_enseignant)
                .delete(delete_enseignant),
        )
        .route("/{id}/students", get(get_enseignant_students))
        .route("/{id}/missions", get(get_enseignant_missions))
        .route("/{id}/courses", get(get_enseignant_courses))
        .route("/{id}/reports", get(get_enseignant_reports))
        .route("/{id}/options", get(get_enseignant_options))
        .route("/{id}/payments", get(get_enseignant_payments))
}
