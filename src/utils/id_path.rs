//! Path extractors for numeric ids.
//!
//! Axum's `Path<i64>` answers a malformed id with a plain-text rejection and
//! accepts `+5` or `-3`. These extractors accept only positive base-10
//! integers and reject anything else with a JSON 400.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

/// Two ids, for nested routes such as `/resources/{id}/share/{user_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPairPath(pub i64, pub i64);

pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    let invalid = || AppError::bad_request(anyhow::anyhow!("Invalid ID: {}", raw));

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid()),
    }
}

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid ID")))?;
        parse_id(&raw).map(IdPath)
    }
}

impl<S> FromRequestParts<S> for IdPairPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid ID")))?;
        Ok(IdPairPath(parse_id(&first)?, parse_id(&second)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_positive_integers() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("999999").unwrap(), 999999);
    }

    #[test]
    fn test_parse_id_rejects_malformed_values() {
        for raw in ["", "0", "-1", "+5", "abc", "1.5", " 7", "99999999999999999999"] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.status.as_u16(), 400, "expected 400 for {:?}", raw);
        }
    }
}
