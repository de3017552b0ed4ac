use crate::state::AppState;
use axum::{Router, routing::get};

use super::controller::{
    calculate_route, create_address, delete_address, geocode, get_address, get_addresses,
    update_address,
};

pub fn init_addresses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_addresses).post(create_address))
        .route("/geocode", get(geocode))
        .route("/route", get(calculate_route))
        .route(
            "/{id}",
            get(get_address).put(update_address).delete(delete_address),
        )
}
