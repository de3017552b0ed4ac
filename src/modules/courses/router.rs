use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    cancel_course, complete_course, create_course, declare_course, delete_course, get_course,
    get_course_payments, get_courses, get_teacher_courses, schedule_course, update_course,
};

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/schedule", put(schedule_course))
        .route("/{id}/cancel", put(cancel_course))
        .route("/{id}/complete", put(complete_course))
        .route("/{id}/declare", post(declare_course))
        .route("/{id}/payments", get(get_course_payments))
}

/// Mounted at `/teacher`.
pub fn init_teacher_router() -> Router<AppState> {
    Router::new().route("/courses", get(get_teacher_courses))
}
