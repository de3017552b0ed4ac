use crate::modules::users::controller::{
    delete_user, get_user, get_user_addresses, get_user_payments, get_user_resources, get_users,
    update_user,
};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/addresses", get(get_user_addresses))
        .route("/{id}/payments", get(get_user_payments))
        .route("/{id}/resources", get(get_user_resources))
}

/// `/admin/users`: the administrator aliases of list, update and delete.
pub fn init_admin_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/{id}", axum::routing::put(update_user).delete(delete_user))
}
