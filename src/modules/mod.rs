pub mod addresses;
pub mod auth;
pub mod courses;
pub mod enseignants;
pub mod familles;
pub mod health;
pub mod missions;
pub mod offers;
pub mod options;
pub mod payments;
pub mod reports;
pub mod resources;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::users::model::User;
