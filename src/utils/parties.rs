use crate::middleware::auth::AuthUser;
use crate::utils::errors::AppError;
use edumarket_models::UserRole;

/// Resolves `(famille_id, enseignant_id)` for a mission or option created
/// by `auth_user`.
///
/// A famille always acts for itself. An enseignant must name itself as the
/// teacher and supply the family. An administrator must supply both.
pub fn resolve_parties(
    auth_user: &AuthUser,
    famille_id: Option<i64>,
    enseignant_id: i64,
) -> Result<(i64, i64), AppError> {
    let caller = auth_user.user_id();
    let missing_famille =
        || AppError::bad_request(anyhow::anyhow!("famille_id is required"));

    match auth_user.role()? {
        UserRole::Famille => Ok((caller, enseignant_id)),
        UserRole::Enseignant => {
            if enseignant_id != caller {
                return Err(AppError::forbidden(
                    "Enseignants can only act for themselves".to_string(),
                ));
            }
            Ok((famille_id.ok_or_else(missing_famille)?, caller))
        }
        UserRole::Administrator => Ok((famille_id.ok_or_else(missing_famille)?, enseignant_id)),
    }
}
