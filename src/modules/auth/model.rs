pub use edumarket_auth::Claims;
pub use edumarket_models::auth::*;
pub use edumarket_models::users::{
    ChangePasswordDto, UpdateProfileDto, UserResponse, UserRole,
};
