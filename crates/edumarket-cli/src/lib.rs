//! # Edumarket CLI
//!
//! Database seeding utilities for Edumarket testing and development.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use edumarket_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::default().with_familles(50);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
