//! # Edumarket Core
//!
//! Core types, errors, and utilities shared by every Edumarket crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: Deserialization helpers for loosely-typed query strings
//!
//! # Example
//!
//! ```ignore
//! use edumarket_core::errors::AppError;
//! use edumarket_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Mission not found"));
//! let hash = hash_password("secure_password")?;
//! ```

pub mod errors;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use password::{hash_password, verify_password};
