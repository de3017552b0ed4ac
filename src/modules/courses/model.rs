pub use edumarket_models::courses::*;
