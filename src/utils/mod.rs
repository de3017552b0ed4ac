//! Shared utilities.
//!
//! - [`errors`]: application error type (from `edumarket-core`)
//! - [`password`]: bcrypt hashing (from `edumarket-core`)
//! - [`serde`]: query-string helpers (from `edumarket-core`)
//! - [`id_path`]: strict positive-integer path extractors
//! - [`parties`]: family/teacher resolution for missions and options

pub mod id_path;
pub mod parties;

pub use edumarket_core::{errors, password, serde};
