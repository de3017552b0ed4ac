//! User domain models and DTOs.
//!
//! A [`User`] is the account row. Its immutable [`UserRole`] decides which
//! single role profile exists for it, modelled here as the [`Profile`] sum
//! type rather than three loosely related records.

use chrono::{DateTime, Utc};
use edumarket_core::serde::{deserialize_optional_bool, deserialize_optional_string};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::courses::Course;
use crate::missions::Mission;
use crate::options::TeachingOption;
use crate::reports::Report;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Famille,
    Enseignant,
    Administrator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Famille => "famille",
            UserRole::Enseignant => "enseignant",
            UserRole::Administrator => "administrator",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "famille" => Ok(UserRole::Famille),
            "enseignant" => Ok(UserRole::Enseignant),
            "administrator" => Ok(UserRole::Administrator),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// An account. The password hash is never part of this struct; see
/// [`UserWithPassword`] for the credential-checking read.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(FromRow, Debug, Clone)]
pub struct UserWithPassword {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Famille {
    pub user_id: i64,
    pub family_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Enseignant {
    pub user_id: i64,
    pub specialization: String,
    pub qualifications: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Administrator {
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The role-specific half of an account.
///
/// Serialized adjacently tagged: `{"kind": "family", "data": {...}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Profile {
    Family(Famille),
    Teacher(Enseignant),
    Admin(Administrator),
}

impl Profile {
    /// The role this profile belongs to.
    pub fn role(&self) -> UserRole {
        match self {
            Profile::Family(_) => UserRole::Famille,
            Profile::Teacher(_) => UserRole::Enseignant,
            Profile::Admin(_) => UserRole::Administrator,
        }
    }

    pub fn user_id(&self) -> i64 {
        match self {
            Profile::Family(f) => f.user_id,
            Profile::Teacher(e) => e.user_id,
            Profile::Admin(a) => a.user_id,
        }
    }
}

/// A user together with its profile, as returned by every user-facing read.
///
/// `profile` is `None` only when the profile row is missing or soft-deleted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: User,
    pub profile: Option<Profile>,
}

/// Partial update of an account and its profile.
///
/// Every field is optional. A blank `username` or `email` counts as absent.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 3, max = 50, message = "username must be between 3 and 50 characters"))]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
    pub family_name: Option<String>,
    pub specialization: Option<String>,
    pub qualifications: Option<String>,
}

/// Self-service profile update. Same as [`UpdateUserDto`] without `is_active`.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 3, max = 50, message = "username must be between 3 and 50 characters"))]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub family_name: Option<String>,
    pub specialization: Option<String>,
    pub qualifications: Option<String>,
}

impl From<UpdateProfileDto> for UpdateUserDto {
    fn from(dto: UpdateProfileDto) -> Self {
        Self {
            username: dto.username,
            email: dto.email,
            phone_number: dto.phone_number,
            is_active: None,
            family_name: dto.family_name,
            specialization: dto.specialization,
            qualifications: dto.qualifications,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "current_password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "new_password must be at least 6 characters"))]
    pub new_password: String,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct UserFilterParams {
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateFamilleDto {
    #[validate(length(max = 255))]
    pub family_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateEnseignantDto {
    #[validate(length(max = 255))]
    pub specialization: Option<String>,
    pub qualifications: Option<String>,
}

/// Administrator-side creation of a teacher account.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateEnseignantDto {
    #[validate(length(min = 3, max = 50, message = "username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub qualifications: String,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct EnseignantFilterParams {
    /// Case-insensitive substring match
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub specialization: Option<String>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct FamilleDetails {
    pub user: User,
    pub profile: Famille,
    pub missions: Vec<Mission>,
    pub courses: Vec<Course>,
    pub options: Vec<TeachingOption>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct EnseignantDetails {
    pub user: User,
    pub profile: Enseignant,
    pub missions: Vec<Mission>,
    pub courses: Vec<Course>,
    pub reports: Vec<Report>,
}

/// A teacher account joined with its profile, for listings.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct EnseignantSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    pub specialization: String,
    pub qualifications: String,
}

/// A family account joined with its profile, for listings.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct FamilleSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub user: User,
    pub family_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: 5,
            username: "marie".to_string(),
            email: "marie@example.com".to_string(),
            phone_number: None,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [UserRole::Famille, UserRole::Enseignant, UserRole::Administrator] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("teacher".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(UserRole::Enseignant).unwrap(), json!("enseignant"));
    }

    #[test]
    fn test_profile_role_matches_variant() {
        let now = Utc::now();
        let profile = Profile::Teacher(Enseignant {
            user_id: 5,
            specialization: "Maths".to_string(),
            qualifications: String::new(),
            created_at: now,
            updated_at: now,
        });
        assert_eq!(profile.role(), UserRole::Enseignant);
        assert_eq!(profile.user_id(), 5);
    }

    #[test]
    fn test_user_response_flattens_user_and_tags_profile() {
        let now = Utc::now();
        let response = UserResponse {
            user: sample_user(UserRole::Famille),
            profile: Some(Profile::Family(Famille {
                user_id: 5,
                family_name: "Martin".to_string(),
                created_at: now,
                updated_at: now,
            })),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["id"], 5);
        assert_eq!(value["role"], "famille");
        assert_eq!(value["profile"]["kind"], "family");
        assert_eq!(value["profile"]["data"]["family_name"], "Martin");
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_blank_username_and_email_are_absent() {
        let dto: UpdateUserDto =
            serde_json::from_value(json!({"username": "", "email": "  ", "phone_number": ""}))
                .unwrap();
        assert!(dto.username.is_none());
        assert!(dto.email.is_none());
        assert_eq!(dto.phone_number.as_deref(), Some(""));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_update_user_rejects_short_username() {
        let dto: UpdateUserDto = serde_json::from_value(json!({"username": "ab"})).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_has_no_role_field() {
        let dto: UpdateUserDto =
            serde_json::from_value(json!({"role": "administrator", "is_active": false})).unwrap();
        assert_eq!(dto.is_active, Some(false));
    }

    #[test]
    fn test_profile_dto_converts_without_is_active() {
        let dto = UpdateProfileDto {
            family_name: Some("Durand".to_string()),
            ..Default::default()
        };
        let update: UpdateUserDto = dto.into();
        assert!(update.is_active.is_none());
        assert_eq!(update.family_name.as_deref(), Some("Durand"));
    }

    #[test]
    fn test_change_password_requires_six_characters() {
        let dto = ChangePasswordDto {
            current_password: "old".to_string(),
            new_password: "12345".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
