pub use edumarket_models::options::*;
