//! Option domain models and DTOs.
//!
//! An option reserves a teacher's availability for a family, optionally
//! against an offer, until its expiration date. The struct is called
//! [`TeachingOption`] to keep clear of `std::option::Option`.

use chrono::{DateTime, Duration, Utc};
use edumarket_core::AppError;
use edumarket_core::serde::deserialize_optional_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Lifetime of an option created without an explicit expiration date.
pub const DEFAULT_OPTION_VALIDITY_DAYS: i64 = 7;

/// Window used by the "expiring soon" listing.
pub const EXPIRING_WINDOW_HOURS: i64 = 48;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "option_status", rename_all = "snake_case")]
pub enum OptionStatus {
    #[default]
    Active,
    Accepted,
    Expired,
    Cancelled,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct TeachingOption {
    pub id: i64,
    pub creation_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub status: OptionStatus,
    pub description: String,
    pub enseignant_id: i64,
    pub famille_id: i64,
    pub offer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeachingOption {
    pub fn default_expiration(creation_date: DateTime<Utc>) -> DateTime<Utc> {
        creation_date + Duration::days(DEFAULT_OPTION_VALIDITY_DAYS)
    }

    /// Picks the stored expiration date for an option created at
    /// `creation_date`.
    ///
    /// # Errors
    ///
    /// 400 when `requested` lies before `creation_date`.
    pub fn resolve_expiration(
        creation_date: DateTime<Utc>,
        requested: Option<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>, AppError> {
        match requested {
            None => Ok(Self::default_expiration(creation_date)),
            Some(date) if date < creation_date => Err(AppError::bad_request(anyhow::anyhow!(
                "expiration_date must not be earlier than the creation date"
            ))),
            Some(date) => Ok(date),
        }
    }

    pub fn accept(&mut self) {
        self.status = OptionStatus::Accepted;
    }

    /// Declining has no state of its own and lands on `expired`.
    pub fn decline(&mut self) {
        self.status = OptionStatus::Expired;
    }

    pub fn cancel(&mut self) {
        self.status = OptionStatus::Cancelled;
    }

    pub fn reject(&mut self) {
        self.status = OptionStatus::Cancelled;
    }

    /// Expires the option regardless of its current status.
    pub fn expire(&mut self) {
        self.status = OptionStatus::Expired;
    }

    /// Expires an active option whose expiration date has passed. Returns
    /// whether the status changed.
    pub fn check_expiration(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == OptionStatus::Active && now > self.expiration_date {
            self.status = OptionStatus::Expired;
            true
        } else {
            false
        }
    }

    pub fn involves(&self, user_id: i64) -> bool {
        self.famille_id == user_id || self.enseignant_id == user_id
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateOptionDto {
    pub enseignant_id: i64,
    /// Required when the caller is an enseignant or an administrator
    pub famille_id: Option<i64>,
    pub offer_id: Option<i64>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    /// Defaults to seven days after creation
    pub expiration_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateOptionDto {
    pub status: Option<OptionStatus>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct OptionFilterParams {
    pub status: Option<OptionStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub famille_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub enseignant_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offer_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option_expiring_at(expiration_date: DateTime<Utc>) -> TeachingOption {
        let now = Utc::now();
        TeachingOption {
            id: 1,
            creation_date: now,
            expiration_date,
            status: OptionStatus::default(),
            description: String::new(),
            enseignant_id: 20,
            famille_id: 10,
            offer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_default_expiration_is_seven_days() {
        let created = Utc::now();
        let expiration = TeachingOption::resolve_expiration(created, None).unwrap();
        assert_eq!(expiration - created, Duration::days(7));
    }

    #[test]
    fn test_explicit_expiration_is_kept() {
        let created = Utc::now();
        let requested = created + Duration::days(2);
        assert_eq!(
            TeachingOption::resolve_expiration(created, Some(requested)).unwrap(),
            requested
        );
        assert_eq!(
            TeachingOption::resolve_expiration(created, Some(created)).unwrap(),
            created
        );
    }

    #[test]
    fn test_expiration_before_creation_is_bad_request() {
        let created = Utc::now();
        let err =
            TeachingOption::resolve_expiration(created, Some(created - Duration::hours(1)))
                .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[test]
    fn test_decline_results_in_expired() {
        let mut o = option_expiring_at(Utc::now() + Duration::days(7));
        o.decline();
        assert_eq!(o.status, OptionStatus::Expired);
    }

    #[test]
    fn test_cancel_and_reject_converge() {
        let mut a = option_expiring_at(Utc::now());
        let mut b = a.clone();
        a.cancel();
        b.reject();
        assert_eq!(a.status, OptionStatus::Cancelled);
        assert_eq!(a.status, b.status);
    }

    #[test]
    fn test_expire_has_no_active_guard() {
        let mut o = option_expiring_at(Utc::now());
        o.accept();
        o.expire();
        assert_eq!(o.status, OptionStatus::Expired);
    }

    #[test]
    fn test_check_expiration_only_touches_stale_active_options() {
        let now = Utc::now();

        let mut stale = option_expiring_at(now - Duration::hours(1));
        assert!(stale.check_expiration(now));
        assert_eq!(stale.status, OptionStatus::Expired);

        let mut fresh = option_expiring_at(now + Duration::hours(1));
        assert!(!fresh.check_expiration(now));
        assert_eq!(fresh.status, OptionStatus::Active);

        let mut accepted = option_expiring_at(now - Duration::hours(1));
        accepted.accept();
        assert!(!accepted.check_expiration(now));
        assert_eq!(accepted.status, OptionStatus::Accepted);
    }
}
