pub use edumarket_models::offers::*;
