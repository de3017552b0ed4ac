mod common;

use axum::http::StatusCode;
use common::{PASSWORD, create_admin, login, register_enseignant, register_famille, send, setup_test_app, unique};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_register_famille_returns_token_and_profile(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = unique("famille");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@test.com", username),
            "password": PASSWORD,
            "role": "famille",
            "family_name": "Durand"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["expires_in"], 24 * 3600);
    assert_eq!(body["user"]["username"], username);
    assert_eq!(body["user"]["role"], "famille");
    assert_eq!(body["user"]["profile"]["kind"], "family");
    assert_eq!(body["user"]["profile"]["data"]["family_name"], "Durand");
    assert!(body["user"].get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_as_administrator_is_forbidden(pool: PgPool) {
    let app = setup_test_app(pool);
    let username = unique("admin");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@test.com", username),
            "password": PASSWORD,
            "role": "administrator"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email_conflicts(pool: PgPool) {
    let app = setup_test_app(pool);
    let existing = register_famille(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": unique("other"),
            "email": existing.email,
            "password": PASSWORD,
            "role": "enseignant"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_validation_error(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": "ab",
            "email": "not-an-email",
            "password": "123",
            "role": "famille"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("username must be between 3 and 50 characters"));
    assert!(message.contains("email must be a valid email address"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_wrong_password(pool: PgPool) {
    let app = setup_test_app(pool);
    let user = register_enseignant(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_with_unknown_email(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "nobody@test.com", "password": PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_can_login(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;

    let token = login(&app, &admin.email, PASSWORD).await;
    let (status, body) = send(&app, "GET", "/api/v1/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "administrator");
    assert_eq!(body["profile"]["kind"], "admin");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_protected_route_requires_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/v1/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/v1/missions", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_issues_new_token(pool: PgPool) {
    let app = setup_test_app(pool);
    let user = register_famille(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "token": user.token })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user.id);
    let refreshed = body["token"].as_str().unwrap();

    let (status, _) = send(&app, "GET", "/api/v1/profile", Some(refreshed), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_garbage(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/refresh",
        None,
        Some(json!({ "token": "garbage" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_logout_acknowledges(pool: PgPool) {
    let app = setup_test_app(pool);
    let user = register_famille(&app).await;

    let (status, body) = send(&app, "POST", "/api/v1/auth/logout", Some(&user.token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_change_password(pool: PgPool) {
    let app = setup_test_app(pool);
    let user = register_enseignant(&app).await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/profile/password",
        Some(&user.token),
        Some(json!({ "current_password": PASSWORD, "new_password": "brand-new-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&app, &user.email, "brand-new-pass").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": user.email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
