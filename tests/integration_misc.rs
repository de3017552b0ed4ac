mod common;

use axum::http::StatusCode;
use common::{create_admin, register_enseignant, register_famille, send, setup_test_app};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_health_check(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_route_is_json_not_found(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/v1/nothing-here", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_famille_reviews_are_not_implemented(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/familles/{}/reviews", famille.id),
        Some(&famille.token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["error"], "Reviews are not implemented yet");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_address_belongs_to_caller(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let other = register_enseignant(&app).await;

    let (status, address) = send(
        &app,
        "POST",
        "/api/v1/addresses",
        Some(&famille.token),
        Some(json!({
            "street": "12 rue des Lilas",
            "city": "Lyon",
            "postal_code": "69003",
            "country": "France"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", address);
    assert_eq!(address["user_id"], famille.id);
    let uri = format!("/api/v1/addresses/{}", address["id"]);

    let (status, _) = send(&app, "GET", &uri, Some(&other.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&famille.token),
        Some(json!({ "city": "Villeurbanne" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Villeurbanne");
    assert_eq!(body["street"], "12 rue des Lilas");

    let (status, _) = send(&app, "GET", "/api/v1/addresses", Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, all) = send(&app, "GET", "/api/v1/addresses", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_geocode_and_route_return_placeholders(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/addresses/geocode?address=Lyon",
        Some(&famille.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "Lyon");
    assert!(body["latitude"].is_f64());

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/addresses/route?from=Lyon&to=Paris",
        Some(&famille.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"], "Lyon");
    assert_eq!(body["to"], "Paris");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enseignant_listing_and_update(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;
    let enseignant = register_enseignant(&app).await;

    let (status, body) = send(&app, "GET", "/api/v1/enseignants", Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let uri = format!("/api/v1/enseignants/{}", enseignant.id);
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&famille.token),
        Some(json!({ "specialization": "Chemistry" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/enseignants/{}", famille.id),
        Some(&famille.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
