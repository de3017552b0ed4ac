use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    change_password, get_profile, login, logout, refresh_token, register, update_profile,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout))
}

pub fn init_profile_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
}
