pub use edumarket_models::users::{
    CreateEnseignantDto, Enseignant, EnseignantDetails, EnseignantFilterParams,
    EnseignantSummary, UpdateEnseignantDto,
};
