//! Offer domain models and DTOs.
//!
//! Offers are job postings written by administrators. They start as
//! drafts and open through `publish`.

use chrono::{DateTime, Utc};
use edumarket_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::options::TeachingOption;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "offer_status", rename_all = "snake_case")]
pub enum OfferStatus {
    #[default]
    Draft,
    Open,
    Closed,
    Filled,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Offer {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub hourly_rate: f64,
    pub publication_date: Option<DateTime<Utc>>,
    pub status: OfferStatus,
    pub requirements: String,
    pub subject: String,
    pub level: String,
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.status = OfferStatus::Open;
        self.publication_date = Some(now);
    }

    /// Closes the offer whatever its current status.
    pub fn close(&mut self) {
        self.status = OfferStatus::Closed;
    }

    pub fn fill(&mut self) {
        self.status = OfferStatus::Filled;
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateOfferDto {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(min = 0.0, message = "hourly_rate must not be negative"))]
    #[schema(example = 25.0)]
    pub hourly_rate: f64,
    pub requirements: Option<String>,
    #[validate(length(min = 1, max = 100, message = "subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, max = 100, message = "level is required"))]
    pub level: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateOfferDto {
    #[validate(length(max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "hourly_rate must not be negative"))]
    pub hourly_rate: Option<f64>,
    pub status: Option<OfferStatus>,
    pub requirements: Option<String>,
    #[validate(length(max = 100))]
    pub subject: Option<String>,
    #[validate(length(max = 100))]
    pub level: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct OfferFilterParams {
    pub status: Option<OfferStatus>,
    /// Case-insensitive substring match
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub subject: Option<String>,
    /// Case-insensitive substring match
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub level: Option<String>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct OfferDetails {
    pub offer: Offer,
    pub options: Vec<TeachingOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> Offer {
        let now = Utc::now();
        Offer {
            id: 1,
            title: "Maths tutor".to_string(),
            description: "Weekly sessions".to_string(),
            hourly_rate: 30.0,
            publication_date: None,
            status: OfferStatus::default(),
            requirements: String::new(),
            subject: "Maths".to_string(),
            level: "Lycée".to_string(),
            created_by_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_offer_starts_as_draft() {
        assert_eq!(offer().status, OfferStatus::Draft);
    }

    #[test]
    fn test_publish_opens_and_stamps_date() {
        let mut o = offer();
        let now = Utc::now();
        o.publish(now);
        assert_eq!(o.status, OfferStatus::Open);
        assert_eq!(o.publication_date, Some(now));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut o = offer();
        o.close();
        o.close();
        assert_eq!(o.status, OfferStatus::Closed);
    }

    #[test]
    fn test_close_overrides_filled() {
        let mut o = offer();
        o.fill();
        assert_eq!(o.status, OfferStatus::Filled);
        o.close();
        assert_eq!(o.status, OfferStatus::Closed);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let dto = CreateOfferDto {
            title: "x".to_string(),
            description: "y".to_string(),
            hourly_rate: -1.0,
            requirements: None,
            subject: "Maths".to_string(),
            level: "College".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
