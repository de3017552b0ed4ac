use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    apply_to_offer, close_offer, create_offer, delete_offer, fill_offer, get_active_offers,
    get_offer, get_offer_applicants, get_offer_options, get_offers, publish_offer, search_offers,
    update_offer,
};

pub fn init_offers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_offers).post(create_offer))
        .route("/search", get(search_offers))
        .route("/active", get(get_active_offers))
        .route("/{id}", get(get_offer).put(update_offer).delete(delete_offer))
        .route("/{id}/publish", put(publish_offer))
        .route("/{id}/close", put(close_offer))
        .route("/{id}/fill", put(fill_offer))
        .route("/{id}/apply", post(apply_to_offer))
        .route("/{id}/options", get(get_offer_options))
        .route("/{id}/applicants", get(get_offer_applicants))
}
