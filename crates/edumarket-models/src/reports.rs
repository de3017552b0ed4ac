//! Report domain models and DTOs.

use chrono::{DateTime, Utc};
use edumarket_core::serde::deserialize_optional_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    Submitted,
    Validated,
    Rejected,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Report {
    pub id: i64,
    pub submission_date: Option<DateTime<Utc>>,
    pub content: String,
    pub status: ReportStatus,
    pub validation_date: Option<DateTime<Utc>>,
    pub comments: Option<String>,
    pub enseignant_id: i64,
    pub mission_id: i64,
    pub validated_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn submit(&mut self, now: DateTime<Utc>) {
        self.status = ReportStatus::Submitted;
        self.submission_date = Some(now);
    }

    pub fn validate_by(&mut self, admin_id: i64, now: DateTime<Utc>, comments: Option<String>) {
        self.review(ReportStatus::Validated, admin_id, now, comments);
    }

    pub fn reject_by(&mut self, admin_id: i64, now: DateTime<Utc>, comments: Option<String>) {
        self.review(ReportStatus::Rejected, admin_id, now, comments);
    }

    fn review(
        &mut self,
        status: ReportStatus,
        admin_id: i64,
        now: DateTime<Utc>,
        comments: Option<String>,
    ) {
        self.status = status;
        self.validation_date = Some(now);
        self.validated_by_id = Some(admin_id);
        if comments.is_some() {
            self.comments = comments;
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateReportDto {
    pub mission_id: i64,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateReportDto {
    pub content: Option<String>,
    pub comments: Option<String>,
}

/// Body of the validate and reject transitions.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ReviewReportDto {
    pub comments: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct ReportFilterParams {
    pub status: Option<ReportStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub mission_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub enseignant_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        let now = Utc::now();
        Report {
            id: 1,
            submission_date: None,
            content: "Progress is steady".to_string(),
            status: ReportStatus::default(),
            validation_date: None,
            comments: None,
            enseignant_id: 20,
            mission_id: 3,
            validated_by_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_submit() {
        let mut r = report();
        let now = Utc::now();
        r.submit(now);
        assert_eq!(r.status, ReportStatus::Submitted);
        assert_eq!(r.submission_date, Some(now));
    }

    #[test]
    fn test_validate_records_reviewer() {
        let mut r = report();
        let now = Utc::now();
        r.validate_by(1, now, Some("Good work".to_string()));
        assert_eq!(r.status, ReportStatus::Validated);
        assert_eq!(r.validated_by_id, Some(1));
        assert_eq!(r.validation_date, Some(now));
        assert_eq!(r.comments.as_deref(), Some("Good work"));
    }

    #[test]
    fn test_reject_without_comments_keeps_existing() {
        let mut r = report();
        r.comments = Some("earlier note".to_string());
        r.reject_by(2, Utc::now(), None);
        assert_eq!(r.status, ReportStatus::Rejected);
        assert_eq!(r.comments.as_deref(), Some("earlier note"));
    }

    #[test]
    fn test_empty_content_rejected() {
        let dto = CreateReportDto {
            mission_id: 1,
            content: String::new(),
        };
        assert!(dto.validate().is_err());
    }
}
