//! # Edumarket Models
//!
//! Domain models and DTOs for the Edumarket API.
//!
//! Entities map one-to-one onto database rows (`sqlx::FromRow`). Each
//! stateful entity carries its named transitions as methods, so handlers
//! never write a status field directly.
//!
//! # Modules
//!
//! - [`users`]: accounts, role profiles and the [`Profile`] sum type
//! - [`auth`]: login, registration and token DTOs
//! - [`missions`]: family/teacher engagements
//! - [`courses`]: sessions within a mission
//! - [`offers`]: administrator job postings
//! - [`options`]: time-limited teacher reservations
//! - [`payments`]: payment bookkeeping and invoices
//! - [`reports`]: teacher reports and administrator review
//! - [`addresses`]: user addresses and placeholder geo lookups
//! - [`resources`]: educational material and sharing
//!
//! # Example
//!
//! ```ignore
//! use edumarket_models::missions::Mission;
//!
//! let mut mission: Mission = fetch_mission().await?;
//! mission.stop(chrono::Utc::now());
//! assert_eq!(mission.status, MissionStatus::Stopped);
//! ```

pub mod addresses;
pub mod auth;
pub mod courses;
pub mod missions;
pub mod offers;
pub mod options;
pub mod payments;
pub mod reports;
pub mod resources;
pub mod users;

pub use auth::{AuthResponse, LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest};
pub use users::{Administrator, Enseignant, Famille, Profile, User, UserResponse, UserRole};
