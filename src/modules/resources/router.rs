use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

use super::controller::{
    create_resource, delete_resource, get_resource, get_resources, share_resource,
    unshare_resource, update_resource,
};

pub fn init_resources_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_resources).post(create_resource))
        .route(
            "/{id}",
            get(get_resource).put(update_resource).delete(delete_resource),
        )
        .route("/{id}/share", post(share_resource))
        .route("/{id}/share/{user_id}", delete(unshare_resource))
}
