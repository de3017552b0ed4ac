mod common;

use axum::http::StatusCode;
use common::{
    TestUser, create_admin, create_course, create_mission, register_enseignant, register_famille,
    send, setup_test_app,
};
use serde_json::{Value, json};
use sqlx::PgPool;

async fn create_payment(app: &axum::Router, payer: &TestUser, body: Value) -> Value {
    let (status, payment) = send(app, "POST", "/api/v1/payments", Some(&payer.token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create payment failed: {}", payment);
    payment
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_lifecycle(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;

    let payment = create_payment(
        &app,
        &famille,
        json!({ "amount": 45.0, "type": "advance", "description": "January advance" }),
    )
    .await;
    assert_eq!(payment["status"], "pending");
    assert_eq!(payment["type"], "advance");
    assert_eq!(payment["user_id"], famille.id);
    let uri = format!("/api/v1/payments/{}", payment["id"]);

    let (status, body) = send(&app, "PUT", &format!("{}/process", uri), Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (status, body) = send(&app, "PUT", &format!("{}/refund", uri), Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "refunded");

    // Processing is not guarded by the current status
    let (status, body) = send(&app, "PUT", &format!("{}/process", uri), Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_fail_and_refund_are_admin_only(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let payment = create_payment(&app, &famille, json!({ "amount": 20.0, "type": "mission" })).await;
    let uri = format!("/api/v1/payments/{}", payment["id"]);

    for action in ["fail", "refund"] {
        let (status, _) = send(&app, "PUT", &format!("{}/{}", uri, action), Some(&famille.token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", action);
    }

    let (status, body) = send(&app, "PUT", &format!("{}/fail", uri), Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payer_only_sees_own_payment(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let other = register_famille(&app).await;
    let payment = create_payment(&app, &famille, json!({ "amount": 20.0, "type": "course" })).await;
    let uri = format!("/api/v1/payments/{}", payment["id"]);

    let (status, _) = send(&app, "GET", &uri, Some(&other.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", &format!("{}/process", uri), Some(&other.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "GET", &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_admin_pays_for_someone_else(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;
    let other = register_famille(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/payments",
        Some(&other.token),
        Some(json!({ "amount": 20.0, "type": "course", "user_id": famille.id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let payment = create_payment(
        &app,
        &admin,
        json!({ "amount": 20.0, "type": "course", "user_id": famille.id }),
    )
    .await;
    assert_eq!(payment["user_id"], famille.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_payment_validation(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/payments",
        Some(&famille.token),
        Some(json!({ "amount": 0.0, "type": "course" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "amount must be greater than 0");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/payments",
        Some(&famille.token),
        Some(json!({ "amount": 10.0, "type": "course", "course_id": 999999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invoice(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;
    let payment = create_payment(
        &app,
        &famille,
        json!({ "amount": 60.0, "type": "course", "description": "Maths" }),
    )
    .await;

    let (status, invoice) = send(
        &app,
        "GET",
        &format!("/api/v1/payments/{}/invoice", payment["id"]),
        Some(&famille.token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let number = invoice["invoice_number"].as_str().unwrap();
    assert!(number.starts_with("INV-"));
    assert!(number.ends_with(&format!("-{}", payment["id"])));
    assert_eq!(invoice["amount"], 60.0);
    assert_eq!(invoice["description"], "Maths");
    assert_eq!(invoice["status"], "pending");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stats_are_admin_only(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = create_admin(&pool, &app).await;
    let famille = register_famille(&app).await;

    let first = create_payment(&app, &famille, json!({ "amount": 30.0, "type": "course" })).await;
    create_payment(&app, &famille, json!({ "amount": 12.5, "type": "advance" })).await;
    send(
        &app,
        "PUT",
        &format!("/api/v1/payments/{}/process", first["id"]),
        Some(&famille.token),
        None,
    )
    .await;

    let (status, _) = send(&app, "GET", "/api/v1/payments/stats", Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) = send(&app, "GET", "/api/v1/payments/stats", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_count"], 2);
    assert_eq!(stats["total_amount"], 42.5);
    assert_eq!(stats["completed_count"], 1);
    assert_eq!(stats["completed_amount"], 30.0);
    assert_eq!(stats["pending_count"], 1);
    assert_eq!(stats["pending_amount"], 12.5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_course_details_include_payments(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;
    let enseignant = register_enseignant(&app).await;
    let mission = create_mission(&app, &famille, &enseignant).await;
    let course = create_course(&app, &famille.token, mission["id"].as_i64().unwrap()).await;

    create_payment(
        &app,
        &famille,
        json!({ "amount": 45.0, "type": "course", "course_id": course["id"] }),
    )
    .await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/courses/{}", course["id"]),
        Some(&famille.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payments"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/missions/{}/payments", mission["id"]),
        Some(&famille.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mission_without_courses_has_no_payments(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;
    let enseignant = register_enseignant(&app).await;
    let mission = create_mission(&app, &famille, &enseignant).await;

    create_payment(&app, &famille, json!({ "amount": 15.0, "type": "mission" })).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/missions/{}/payments", mission["id"]),
        Some(&famille.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enseignant_payments_are_those_made_by_the_enseignant(pool: PgPool) {
    let app = setup_test_app(pool);
    let famille = register_famille(&app).await;
    let enseignant = register_enseignant(&app).await;
    let mission = create_mission(&app, &famille, &enseignant).await;
    let course = create_course(&app, &famille.token, mission["id"].as_i64().unwrap()).await;

    // Paid by the family on the enseignant's course
    create_payment(
        &app,
        &famille,
        json!({ "amount": 45.0, "type": "course", "course_id": course["id"] }),
    )
    .await;
    let own = create_payment(&app, &enseignant, json!({ "amount": 8.0, "type": "advance" })).await;

    let uri = format!("/api/v1/enseignants/{}/payments", enseignant.id);
    let (status, body) = send(&app, "GET", &uri, Some(&enseignant.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let payments = body.as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["id"], own["id"]);
    assert!(payments[0]["course_id"].is_null());

    let (status, _) = send(&app, "GET", &uri, Some(&famille.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
