//! Data models for database seeding configuration.
//!
//! This module contains configuration structures for controlling how
//! test data is generated during seeding operations, and the row shapes
//! generated before insertion.

use chrono::{DateTime, Utc};
use edumarket_models::UserRole;
use edumarket_models::courses::CourseStatus;
use edumarket_models::missions::MissionStatus;
use edumarket_models::offers::OfferStatus;
use edumarket_models::options::OptionStatus;
use edumarket_models::resources::ResourceType;

/// Every seeded account's email ends with this suffix.
pub const SEED_EMAIL_DOMAIN: &str = "seed.edumarket.test";

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password";

/// Seed data for creating a user and its role profile.
pub struct UserSeed {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub family_name: String,
    pub specialization: String,
    pub qualifications: String,
}

/// A user row after insertion.
#[derive(Debug, Clone, Copy)]
pub struct SeededUser {
    pub id: i64,
    pub role: UserRole,
}

pub struct AddressSeed {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub user_id: i64,
}

pub struct OfferSeed {
    pub title: String,
    pub description: String,
    pub hourly_rate: f64,
    pub publication_date: Option<DateTime<Utc>>,
    pub status: OfferStatus,
    pub requirements: String,
    pub subject: String,
    pub level: String,
    pub created_by_id: i64,
}

pub struct OptionSeed {
    pub offer_id: i64,
    pub enseignant_id: i64,
    pub famille_id: i64,
    pub status: OptionStatus,
    pub expiration_date: DateTime<Utc>,
}

pub struct MissionSeed {
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: MissionStatus,
    pub description: String,
    pub famille_id: i64,
    pub enseignant_id: i64,
}

/// A mission row after insertion, with what its courses need to copy.
#[derive(Debug, Clone, Copy)]
pub struct SeededMission {
    pub id: i64,
    pub famille_id: i64,
    pub enseignant_id: i64,
    pub start_date: DateTime<Utc>,
}

pub struct CourseSeed {
    pub scheduled_time: DateTime<Utc>,
    pub duration: i32,
    pub location: String,
    pub status: CourseStatus,
    pub famille_id: i64,
    pub enseignant_id: i64,
    pub mission_id: i64,
    pub address_id: Option<i64>,
}

pub struct ResourceSeed {
    pub title: String,
    pub resource_type: ResourceType,
    pub url: String,
    pub description: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub is_public: bool,
    pub managed_by_id: i64,
}

/// Number of accounts per role.
#[derive(Clone)]
pub struct UserCounts {
    pub admins: usize,
    pub enseignants: usize,
    pub familles: usize,
}

impl Default for UserCounts {
    fn default() -> Self {
        Self {
            admins: 2,
            enseignants: 50,
            familles: 200,
        }
    }
}

/// Upper bounds for the engagement graph generated per family.
#[derive(Clone)]
pub struct EngagementLimits {
    pub max_missions_per_famille: usize,
    pub max_courses_per_mission: usize,
    /// Probability that a course gets a payment.
    pub paid_course_ratio: f64,
}

impl Default for EngagementLimits {
    fn default() -> Self {
        Self {
            max_missions_per_famille: 3,
            max_courses_per_mission: 15,
            paid_course_ratio: 0.7,
        }
    }
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub users: UserCounts,
    pub offers: usize,
    pub engagements: EngagementLimits,
    pub resources: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: UserCounts::default(),
            offers: 30,
            engagements: EngagementLimits::default(),
            resources: 100,
        }
    }
}

impl SeedConfig {
    pub fn with_users(mut self, users: UserCounts) -> Self {
        self.users = users;
        self
    }

    pub fn with_familles(mut self, familles: usize) -> Self {
        self.users.familles = familles;
        self
    }

    pub fn with_offers(mut self, offers: usize) -> Self {
        self.offers = offers;
        self
    }

    pub fn with_engagements(mut self, engagements: EngagementLimits) -> Self {
        self.engagements = engagements;
        self
    }

    pub fn with_resources(mut self, resources: usize) -> Self {
        self.resources = resources;
        self
    }

    pub fn total_users(&self) -> usize {
        self.users.admins + self.users.enseignants + self.users.familles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SeedConfig::default();
        assert_eq!(config.users.admins, 2);
        assert_eq!(config.users.enseignants, 50);
        assert_eq!(config.users.familles, 200);
        assert_eq!(config.offers, 30);
        assert_eq!(config.engagements.max_missions_per_famille, 3);
        assert_eq!(config.engagements.max_courses_per_mission, 15);
        assert_eq!(config.resources, 100);
        assert_eq!(config.total_users(), 252);
    }

    #[test]
    fn test_builder_overrides() {
        let config = SeedConfig::default()
            .with_familles(10)
            .with_offers(0)
            .with_resources(5);
        assert_eq!(config.users.familles, 10);
        assert_eq!(config.offers, 0);
        assert_eq!(config.resources, 5);
        assert_eq!(config.total_users(), 62);
    }
}
