pub use edumarket_models::users::{Famille, FamilleDetails, FamilleSummary, UpdateFamilleDto};
