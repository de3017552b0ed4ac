//! Course domain models and DTOs.

use chrono::{DateTime, Utc};
use edumarket_core::serde::deserialize_optional_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::missions::Mission;
use crate::payments::Payment;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "course_status", rename_all = "snake_case")]
pub enum CourseStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// One teaching session. `famille_id` and `enseignant_id` are copied from
/// the parent mission when the course is created.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Course {
    pub id: i64,
    pub scheduled_time: DateTime<Utc>,
    /// Minutes
    pub duration: i32,
    pub location: String,
    pub status: CourseStatus,
    pub famille_id: i64,
    pub enseignant_id: i64,
    pub mission_id: i64,
    pub address_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Puts the course back to `scheduled`, moving it when a time is given.
    pub fn schedule(&mut self, scheduled_time: Option<DateTime<Utc>>) {
        if let Some(time) = scheduled_time {
            self.scheduled_time = time;
        }
        self.status = CourseStatus::Scheduled;
    }

    pub fn cancel(&mut self) {
        self.status = CourseStatus::Cancelled;
    }

    pub fn complete(&mut self) {
        self.status = CourseStatus::Completed;
    }

    /// Marks the course as under way. Declared hours are not recorded.
    pub fn declare(&mut self) {
        self.status = CourseStatus::InProgress;
    }

    pub fn involves(&self, user_id: i64) -> bool {
        self.famille_id == user_id || self.enseignant_id == user_id
    }
}

/// Fields of a new course row, with the parties taken from `mission`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub scheduled_time: DateTime<Utc>,
    pub duration: i32,
    pub location: String,
    pub famille_id: i64,
    pub enseignant_id: i64,
    pub mission_id: i64,
    pub address_id: Option<i64>,
}

impl NewCourse {
    pub fn for_mission(mission: &Mission, dto: CreateCourseDto) -> Self {
        Self {
            scheduled_time: dto.scheduled_time,
            duration: dto.duration,
            location: dto.location,
            famille_id: mission.famille_id,
            enseignant_id: mission.enseignant_id,
            mission_id: mission.id,
            address_id: dto.address_id,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateCourseDto {
    pub mission_id: i64,
    pub scheduled_time: DateTime<Utc>,
    #[validate(range(min = 30, max = 480, message = "duration must be between 30 and 480 minutes"))]
    #[schema(example = 60)]
    pub duration: i32,
    #[validate(length(min = 1, max = 255, message = "location is required"))]
    pub location: String,
    pub address_id: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateCourseDto {
    pub scheduled_time: Option<DateTime<Utc>>,
    #[validate(range(min = 30, max = 480, message = "duration must be between 30 and 480 minutes"))]
    pub duration: Option<i32>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub status: Option<CourseStatus>,
    pub address_id: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
pub struct ScheduleCourseDto {
    pub scheduled_time: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct DeclareCourseDto {
    #[validate(range(exclusive_min = 0.0, message = "hours must be greater than 0"))]
    pub hours: f64,
    pub remarks: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct CourseFilterParams {
    pub status: Option<CourseStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub famille_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub enseignant_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub mission_id: Option<i64>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct CourseDetails {
    pub course: Course,
    pub payments: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::missions::MissionStatus;
    use chrono::Duration;

    fn course() -> Course {
        let now = Utc::now();
        Course {
            id: 1,
            scheduled_time: now,
            duration: 60,
            location: "Home".to_string(),
            status: CourseStatus::default(),
            famille_id: 10,
            enseignant_id: 20,
            mission_id: 3,
            address_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_course_copies_mission_parties() {
        let now = Utc::now();
        let mission = Mission {
            id: 3,
            start_date: now,
            end_date: None,
            status: MissionStatus::Active,
            description: String::new(),
            famille_id: 10,
            enseignant_id: 20,
            created_at: now,
            updated_at: now,
        };
        let dto = CreateCourseDto {
            mission_id: 3,
            scheduled_time: now,
            duration: 90,
            location: "Library".to_string(),
            address_id: Some(4),
        };
        let new = NewCourse::for_mission(&mission, dto);
        assert_eq!(new.famille_id, mission.famille_id);
        assert_eq!(new.enseignant_id, mission.enseignant_id);
        assert_eq!(new.mission_id, 3);
        assert_eq!(new.address_id, Some(4));
    }

    #[test]
    fn test_transitions() {
        let mut c = course();
        c.declare();
        assert_eq!(c.status, CourseStatus::InProgress);
        c.complete();
        assert_eq!(c.status, CourseStatus::Completed);
        c.cancel();
        assert_eq!(c.status, CourseStatus::Cancelled);
        c.schedule(None);
        assert_eq!(c.status, CourseStatus::Scheduled);
    }

    #[test]
    fn test_schedule_with_time_moves_course() {
        let mut c = course();
        let later = c.scheduled_time + Duration::days(2);
        c.schedule(Some(later));
        assert_eq!(c.scheduled_time, later);
    }

    #[test]
    fn test_declare_keeps_duration() {
        let mut c = course();
        c.declare();
        assert_eq!(c.duration, 60);
    }

    #[test]
    fn test_duration_bounds() {
        let mut dto = CreateCourseDto {
            mission_id: 1,
            scheduled_time: Utc::now(),
            duration: 29,
            location: "Home".to_string(),
            address_id: None,
        };
        assert!(dto.validate().is_err());
        dto.duration = 30;
        assert!(dto.validate().is_ok());
        dto.duration = 480;
        assert!(dto.validate().is_ok());
        dto.duration = 481;
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_declare_requires_positive_hours() {
        let dto = DeclareCourseDto {
            hours: 0.0,
            remarks: None,
        };
        assert!(dto.validate().is_err());
        let dto = DeclareCourseDto {
            hours: 1.5,
            remarks: Some("Fractions".to_string()),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_in_progress_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(CourseStatus::InProgress).unwrap(),
            serde_json::json!("in_progress")
        );
    }
}
