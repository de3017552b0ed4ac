#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use edumarket::config::{CorsConfig, JwtConfig};
use edumarket::router::init_router;
use edumarket::state::AppState;
use edumarket::utils::password::hash_password;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "testpass123";

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub token: String,
}

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState::new(pool, JwtConfig::default(), CorsConfig::allow_any());
    init_router(state)
}

pub fn unique(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

/// Sends one request and returns the status with the JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Registers a famille or enseignant through the API.
pub async fn register(app: &Router, role: &str) -> TestUser {
    let username = unique(role);
    let email = format!("{}@test.com", username);
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": email,
            "password": PASSWORD,
            "role": role,
            "family_name": "Martin",
            "specialization": "Mathematics",
            "qualifications": "Master's degree"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    TestUser {
        id: body["user"]["id"].as_i64().unwrap(),
        email,
        username,
        token: body["token"].as_str().unwrap().to_string(),
    }
}

pub async fn register_famille(app: &Router) -> TestUser {
    register(app, "famille").await
}

pub async fn register_enseignant(app: &Router) -> TestUser {
    register(app, "enseignant").await
}

/// Administrators cannot self-register, so they are inserted directly.
pub async fn create_admin(pool: &PgPool, app: &Router) -> TestUser {
    let username = unique("admin");
    let email = format!("{}@test.com", username);
    let hashed = hash_password(PASSWORD).unwrap();

    let mut tx = pool.begin().await.unwrap();
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, password, role)
        VALUES ($1, $2, $3, 'administrator')
        RETURNING id
        "#,
    )
    .bind(&username)
    .bind(&email)
    .bind(&hashed)
    .fetch_one(&mut *tx)
    .await
    .unwrap();

    sqlx::query("INSERT INTO administrators (user_id) VALUES ($1)")
        .bind(id)
        .execute(&mut *tx)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let token = login(app, &email, PASSWORD).await;
    TestUser {
        id,
        email,
        username,
        token,
    }
}

/// Creates a mission as `famille` with `enseignant` as the teacher.
pub async fn create_mission(app: &Router, famille: &TestUser, enseignant: &TestUser) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/missions",
        Some(&famille.token),
        Some(json!({
            "enseignant_id": enseignant.id,
            "start_date": "2025-01-06T09:00:00Z",
            "description": "Weekly maths support"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create mission failed: {}", body);
    body
}

pub async fn create_course(app: &Router, token: &str, mission_id: i64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/courses",
        Some(token),
        Some(json!({
            "mission_id": mission_id,
            "scheduled_time": "2025-01-08T17:00:00Z",
            "duration": 90,
            "location": "Online"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create course failed: {}", body);
    body
}

pub async fn create_offer(app: &Router, admin: &TestUser) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/offers",
        Some(&admin.token),
        Some(json!({
            "title": "Physics tutor wanted",
            "description": "Two sessions a week",
            "hourly_rate": 30.0,
            "subject": "Physics",
            "level": "High school"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create offer failed: {}", body);
    body
}

pub async fn create_option(app: &Router, famille: &TestUser, enseignant: &TestUser) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/options",
        Some(&famille.token),
        Some(json!({
            "enseignant_id": enseignant.id,
            "description": "Reserve Wednesday afternoons"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create option failed: {}", body);
    body
}
