//! Mission domain models and DTOs.
//!
//! A mission is the engagement between one family and one teacher. It
//! starts `active`; `stop` and `extend` are its only named transitions.

use chrono::{DateTime, Utc};
use edumarket_core::serde::deserialize_optional_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::courses::Course;
use crate::reports::Report;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "mission_status", rename_all = "snake_case")]
pub enum MissionStatus {
    #[default]
    Active,
    Completed,
    Stopped,
    Paused,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Mission {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: MissionStatus,
    pub description: String,
    pub famille_id: i64,
    pub enseignant_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mission {
    /// Ends the mission now.
    pub fn stop(&mut self, now: DateTime<Utc>) {
        self.status = MissionStatus::Stopped;
        self.end_date = Some(now);
    }

    /// Moves the end date and reactivates the mission. The new end date is
    /// not compared against `start_date`.
    pub fn extend(&mut self, end_date: DateTime<Utc>) {
        self.end_date = Some(end_date);
        self.status = MissionStatus::Active;
    }

    pub fn involves(&self, user_id: i64) -> bool {
        self.famille_id == user_id || self.enseignant_id == user_id
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateMissionDto {
    /// Required when the caller is an enseignant or an administrator
    pub famille_id: Option<i64>,
    pub enseignant_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateMissionDto {
    pub end_date: Option<DateTime<Utc>>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub status: Option<MissionStatus>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ExtendMissionDto {
    pub end_date: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct MissionFilterParams {
    pub status: Option<MissionStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub famille_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub enseignant_id: Option<i64>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct MissionDetails {
    pub mission: Mission,
    pub courses: Vec<Course>,
    pub reports: Vec<Report>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn mission() -> Mission {
        let now = Utc::now();
        Mission {
            id: 1,
            start_date: now,
            end_date: None,
            status: MissionStatus::default(),
            description: String::new(),
            famille_id: 10,
            enseignant_id: 20,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_mission_defaults_to_active() {
        assert_eq!(MissionStatus::default(), MissionStatus::Active);
    }

    #[test]
    fn test_stop_sets_status_and_end_date() {
        let mut m = mission();
        let now = Utc::now();
        m.stop(now);
        assert_eq!(m.status, MissionStatus::Stopped);
        assert_eq!(m.end_date, Some(now));
        assert!(m.end_date.unwrap() >= m.start_date);
    }

    #[test]
    fn test_extend_reactivates_stopped_mission() {
        let mut m = mission();
        m.stop(Utc::now());
        let later = Utc::now() + Duration::days(30);
        m.extend(later);
        assert_eq!(m.status, MissionStatus::Active);
        assert_eq!(m.end_date, Some(later));
    }

    #[test]
    fn test_extend_accepts_end_date_before_start() {
        let mut m = mission();
        let earlier = m.start_date - Duration::days(10);
        m.extend(earlier);
        assert_eq!(m.end_date, Some(earlier));
        assert_eq!(m.status, MissionStatus::Active);
    }

    #[test]
    fn test_involves_both_parties() {
        let m = mission();
        assert!(m.involves(10));
        assert!(m.involves(20));
        assert!(!m.involves(30));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(MissionStatus::Stopped).unwrap(),
            serde_json::json!("stopped")
        );
    }
}
