//! Application error type.
//!
//! Every handler returns `Result<_, AppError>`. The error carries the HTTP
//! status it should be rendered with and renders as `{"error": "<message>"}`.
//!
//! | Constructor | Status |
//! |-------------|--------|
//! | [`AppError::bad_request`] | 400 |
//! | [`AppError::unauthorized`] | 401 |
//! | [`AppError::forbidden`] | 403 |
//! | [`AppError::not_found`] | 404 |
//! | [`AppError::conflict`] | 409 |
//! | [`AppError::internal`] | 500 |
//! | [`AppError::not_implemented`] | 501 |
//!
//! Anything convertible into [`anyhow::Error`] (notably `sqlx::Error`) becomes
//! a 500 through `?`.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use validator::ValidationErrors;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    pub fn not_implemented(message: String) -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, anyhow::anyhow!(message))
    }

    /// Flattens field errors into one comma-separated 400 message.
    pub fn validation(errors: &ValidationErrors) -> Self {
        Self::bad_request(anyhow::anyhow!("{}", format_validation_errors(errors)))
    }
}

/// Renders `validator` errors as `"field: message, ..."`, falling back to the
/// error code when a rule carries no custom message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid ({})", field, error.code),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status.as_u16(), error = %self.error, "Request failed");
        }

        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_renders_error_key() {
        let (status, body) = body_json(AppError::not_found(anyhow::anyhow!("Mission not found"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Mission not found"}));
    }

    #[tokio::test]
    async fn test_constructor_statuses() {
        assert_eq!(
            AppError::bad_request(anyhow::anyhow!("x")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::unauthorized("x".to_string()).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("x".to_string()).status, StatusCode::FORBIDDEN);
        assert_eq!(AppError::conflict(anyhow::anyhow!("x")).status, StatusCode::CONFLICT);
        assert_eq!(
            AppError::not_implemented("x".to_string()).status,
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            AppError::internal_error("x".to_string()).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_question_mark_conversion_is_internal() {
        fn failing() -> Result<(), AppError> {
            "abc".parse::<i64>()?;
            Ok(())
        }
        let (status, body) = body_json(failing().unwrap_err()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "username must be at least 3 characters"))]
        username: String,
        #[validate(range(min = 30))]
        duration: i32,
    }

    #[tokio::test]
    async fn test_validation_errors_map_to_bad_request() {
        let sample = Sample {
            username: "ab".to_string(),
            duration: 10,
        };
        let errors = sample.validate().unwrap_err();
        let (status, body) = body_json(AppError::validation(&errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("username must be at least 3 characters"));
        assert!(message.contains("duration is invalid (range)"));
    }
}
