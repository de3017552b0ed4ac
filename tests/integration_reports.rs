mod common;

use axum::http::StatusCode;
use common::{
    create_admin, create_mission, register_enseignant, register_famille, send, setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_report_submit_then_validate(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let enseignant = register_enseignant(&app).await;
    let mission = create_mission(&app, &famille, &enseignant).await;

    let (status, report) = send(
        &app,
        "POST",
        "/api/v1/reports",
        Some(&enseignant.token),
        Some(json!({ "mission_id": mission["id"], "content": "Good progress on algebra" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", report);
    assert_eq!(report["status"], "pending");
    assert_eq!(report["enseignant_id"], enseignant.id);
    assert!(report["submission_date"].is_null());
    let uri = format!("/api/v1/reports/{}", report["id"]);

    let (status, body) = send(&app, "PUT", &format!("{}/submit", uri), Some(&enseignant.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "submitted");
    assert!(body["submission_date"].is_string());

    let (status, _) = send(&app, "PUT", &format!("{}/validate", uri), Some(&enseignant.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("{}/validate", uri),
        Some(&admin.token),
        Some(json!({ "comments": "Thanks" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "validated");
    assert_eq!(body["validated_by_id"], admin.id);
    assert_eq!(body["comments"], "Thanks");
    assert!(body["validation_date"].is_string());

    let (_, details) = send(
        &app,
        "GET",
        &format!("/api/v1/missions/{}", mission["id"]),
        Some(&famille.token),
        None,
    )
    .await;
    assert_eq!(details["reports"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reject_without_body(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let enseignant = register_enseignant(&app).await;
    let mission = create_mission(&app, &famille, &enseignant).await;

    let (_, report) = send(
        &app,
        "POST",
        "/api/v1/reports",
        Some(&enseignant.token),
        Some(json!({ "mission_id": mission["id"], "content": "Weekly summary" })),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/reports/{}/reject", report["id"]),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "rejected");
    assert!(body["comments"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_mission_enseignant_reports(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;
    let enseignant = register_enseignant(&app).await;
    let other = register_enseignant(&app).await;
    let mission = create_mission(&app, &famille, &enseignant).await;

    for user in [&famille, &other] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/reports",
            Some(&user.token),
            Some(json!({ "mission_id": mission["id"], "content": "Not mine" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/reports",
        Some(&enseignant.token),
        Some(json!({ "mission_id": mission["id"], "content": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "content is required");

    let (status, body) = send(&app, "GET", "/api/v1/reports/999999", Some(&enseignant.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Report not found");
}
