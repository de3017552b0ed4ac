use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::require_admin;
use crate::modules::addresses::init_addresses_router;
use crate::modules::auth::{init_auth_router, init_profile_router};
use crate::modules::courses::{init_courses_router, init_teacher_router};
use crate::modules::enseignants::init_enseignants_router;
use crate::modules::familles::init_familles_router;
use crate::modules::health::init_health_router;
use crate::modules::missions::{init_family_router, init_missions_router};
use crate::modules::offers::init_offers_router;
use crate::modules::options::init_options_router;
use crate::modules::payments::init_payments_router;
use crate::modules::reports::init_reports_router;
use crate::modules::resources::init_resources_router;
use crate::modules::users::{init_admin_users_router, init_users_router};
use crate::state::AppState;
use crate::utils::errors::AppError;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_health_router())
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/profile", init_profile_router())
                .nest("/users", init_users_router())
                .nest(
                    "/admin/users",
                    init_admin_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest("/familles", init_familles_router())
                .nest("/enseignants", init_enseignants_router())
                .nest("/missions", init_missions_router())
                .nest("/courses", init_courses_router())
                .nest("/offers", init_offers_router())
                .nest("/options", init_options_router())
                .nest("/payments", init_payments_router())
                .nest("/reports", init_reports_router())
                .nest("/addresses", init_addresses_router())
                .nest("/resources", init_resources_router())
                .nest("/teacher", init_teacher_router())
                .nest("/family", init_family_router()),
        )
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

async fn route_not_found() -> AppError {
    AppError::new(StatusCode::NOT_FOUND, anyhow::anyhow!("Route not found"))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    if state.cors_config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer.allow_origin(allowed_origins).allow_credentials(true)
}
