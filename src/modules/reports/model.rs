pub use edumarket_models::reports::*;
