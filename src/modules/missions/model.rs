pub use edumarket_models::missions::*;
