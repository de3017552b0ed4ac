pub use edumarket_models::addresses::*;
