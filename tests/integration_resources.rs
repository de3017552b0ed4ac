mod common;

use axum::http::StatusCode;
use common::{TestUser, create_admin, register_enseignant, register_famille, send, setup_test_app};
use serde_json::{Value, json};
use sqlx::PgPool;

async fn create_resource(app: &axum::Router, admin: &TestUser, is_public: bool) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/resources",
        Some(&admin.token),
        Some(json!({
            "title": "Fractions worksheet",
            "type": "document",
            "url": "https://example.com/fractions.pdf",
            "mime_type": "application/pdf",
            "file_size": 20480,
            "is_public": is_public
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create resource failed: {}", body);
    body
}

#[sqlx::test(migrations = "./migrations")]
async fn test_private_resource_visible_once_shared(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let resource = create_resource(&app, &admin, false).await;
    assert_eq!(resource["managed_by_id"], admin.id);
    let uri = format!("/api/v1/resources/{}", resource["id"]);

    let (status, _) = send(&app, "GET", &uri, Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, "GET", "/api/v1/resources", Some(&famille.token), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);

    let (status, body) = send(
        &app,
        "POST",
        &format!("{}/share", uri),
        Some(&admin.token),
        Some(json!({ "user_ids": [famille.id, 999999] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Resource shared with 1 user(s)");

    let (status, body) = send(&app, "GET", &uri, Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "document");

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("{}/share/{}", uri, famille.id),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_public_resource_visible_to_everyone(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let enseignant = register_enseignant(&app).await;
    let public = create_resource(&app, &admin, true).await;
    create_resource(&app, &admin, false).await;

    let (status, listed) = send(&app, "GET", "/api/v1/resources", Some(&enseignant.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], public["id"]);

    let (_, all) = send(&app, "GET", "/api/v1/resources", Some(&admin.token), None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, videos) = send(&app, "GET", "/api/v1/resources?type=video", Some(&admin.token), None).await;
    assert_eq!(videos.as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unshare_without_share_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let resource = create_resource(&app, &admin, false).await;

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/resources/{}/share/{}", resource["id"], famille.id),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Resource is not shared with this user");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_resource_management_is_admin_only(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let enseignant = register_enseignant(&app).await;
    let resource = create_resource(&app, &admin, true).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/resources",
        Some(&enseignant.token),
        Some(json!({ "title": "Mine", "type": "link", "url": "https://example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/resources/{}/share", resource["id"]),
        Some(&enseignant.token),
        Some(json!({ "user_ids": [enseignant.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/resources",
        Some(&admin.token),
        Some(json!({ "title": "Broken", "type": "link", "url": "not a url" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "url must be a valid URL");
}
