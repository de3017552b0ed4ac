pub use edumarket_models::users::*;
