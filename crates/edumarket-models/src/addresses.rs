//! Address domain models and DTOs.
//!
//! Geocoding and route calculation are not backed by any provider; the
//! placeholder responses below are what the API answers with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const PLACEHOLDER_LATITUDE: f64 = 48.8566;
pub const PLACEHOLDER_LONGITUDE: f64 = 2.3522;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Address {
    pub id: i64,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateAddressDto {
    #[validate(length(min = 1, max = 255, message = "street is required"))]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 20, message = "postal_code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 100, message = "country is required"))]
    pub country: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// Defaults to the caller; only administrators may name another user
    pub user_id: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateAddressDto {
    #[validate(length(max = 255))]
    pub street: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct GeocodeQuery {
    #[serde(default)]
    pub address: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct GeocodeResponse {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub message: String,
}

impl GeocodeResponse {
    pub fn placeholder(address: String) -> Self {
        Self {
            address,
            latitude: PLACEHOLDER_LATITUDE,
            longitude: PLACEHOLDER_LONGITUDE,
            message: "Geocoding is not available yet; coordinates are a placeholder".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct RouteQuery {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct RouteResponse {
    pub from: String,
    pub to: String,
    pub distance: String,
    pub duration: String,
    pub message: String,
}

impl RouteResponse {
    pub fn placeholder(from: String, to: String) -> Self {
        Self {
            from,
            to,
            distance: "5 km".to_string(),
            duration: "15 min".to_string(),
            message: "Route calculation is not available yet; values are a placeholder"
                .to_string(),
        }
    }
}
