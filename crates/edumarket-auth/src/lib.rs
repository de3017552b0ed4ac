//! # Edumarket Auth
//!
//! Bearer-token plumbing for the Edumarket API.
//!
//! - [`claims`]: the JWT payload (user id and role)
//! - [`jwt`]: issuing, verifying and refreshing tokens
//!
//! Tokens are stateless HS256 JWTs. A token carries everything the
//! authorization gate needs, so no database round-trip is made to
//! authenticate a request.
//!
//! # Example
//!
//! ```ignore
//! use edumarket_auth::{create_access_token, verify_token};
//! use edumarket_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(42, "famille", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.user_id, 42);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, refresh_access_token, verify_token};
