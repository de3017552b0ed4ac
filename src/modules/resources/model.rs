pub use edumarket_models::resources::*;
