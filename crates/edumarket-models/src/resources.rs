//! Educational resource models and DTOs.
//!
//! A resource is visible to everyone when public, otherwise only to the
//! users it has been shared with (and to administrators).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "resource_type", rename_all = "snake_case")]
pub enum ResourceType {
    Document,
    Video,
    Audio,
    Image,
    Link,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Resource {
    pub id: i64,
    pub title: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub url: String,
    pub description: String,
    /// Bytes
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub upload_date: DateTime<Utc>,
    pub is_public: bool,
    pub managed_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateResourceDto {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[validate(url(message = "url must be a valid URL"))]
    pub url: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub file_size: Option<i64>,
    #[validate(length(max = 100))]
    pub mime_type: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateResourceDto {
    #[validate(length(max = 255))]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    #[validate(url(message = "url must be a valid URL"))]
    pub url: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub file_size: Option<i64>,
    #[validate(length(max = 100))]
    pub mime_type: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct ShareResourceDto {
    #[validate(length(min = 1, message = "user_ids must not be empty"))]
    pub user_ids: Vec<i64>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct ResourceFilterParams {
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
}
