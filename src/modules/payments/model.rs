pub use edumarket_models::payments::*;
