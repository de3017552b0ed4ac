//! Middleware and extractors for authentication and authorization.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor validating bearer tokens
//! - [`role`]: role-gating middleware, role extractors and ownership checks
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the JWT and exposes the caller's id and role
//! 3. Role extractors or ownership helpers decide whether the caller may act
//! 4. The handler runs
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::ensure_self_or_admin;
//!
//! async fn get_user(auth_user: AuthUser, IdPath(id): IdPath) -> Result<Json<User>, AppError> {
//!     ensure_self_or_admin(&auth_user, id)?;
//!     // ...
//! }
//! ```

pub mod auth;
pub mod role;
