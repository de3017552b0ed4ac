mod common;

use axum::http::StatusCode;
use common::{create_admin, register_enseignant, register_famille, send, setup_test_app};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_list_users_is_admin_only(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;

    let (status, _) = send(&app, "GET", "/api/v1/users", Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/api/v1/users", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/users?role=famille",
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], famille.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_alias_router_requires_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;

    let (status, _) = send(&app, "GET", "/api/v1/admin/users", Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", "/api/v1/admin/users", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_user_self_or_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let other = register_enseignant(&app).await;

    let uri = format!("/api/v1/users/{}", famille.id);

    let (status, body) = send(&app, "GET", &uri, Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["kind"], "family");

    let (status, _) = send(&app, "GET", &uri, Some(&other.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_user_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;

    let (status, body) = send(&app, "GET", "/api/v1/users/999999", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_malformed_id_is_bad_request(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;

    for uri in ["/api/v1/users/abc", "/api/v1/users/-1", "/api/v1/missions/0"] {
        let (status, body) = send(&app, "GET", uri, Some(&admin.token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid ID"));
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_update_ignores_blank_username(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/profile",
        Some(&famille.token),
        Some(json!({ "username": "", "phone_number": "+33 6 12 34 56 78" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["username"], famille.username);
    assert_eq!(body["email"], famille.email);
    assert_eq!(body["phone_number"], "+33 6 12 34 56 78");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_updates_profile_fields(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let enseignant = register_enseignant(&app).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/users/{}", enseignant.id),
        Some(&admin.token),
        Some(json!({ "specialization": "Physics" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["profile"]["kind"], "teacher");
    assert_eq!(body["profile"]["data"]["specialization"], "Physics");
    assert_eq!(body["profile"]["data"]["qualifications"], "Master's degree");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_to_taken_email_conflicts(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let first = register_famille(&app).await;
    let second = register_famille(&app).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/users/{}", second.id),
        Some(&admin.token),
        Some(json!({ "email": first.email })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_deleted_user_disappears(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let uri = format!("/api/v1/users/{}", famille.id);

    let (status, body) = send(&app, "DELETE", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, _) = send(&app, "GET", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let deleted_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT deleted_at FROM users WHERE id = $1")
            .bind(famille.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(deleted_at.is_some());
}
