//! Query-string deserialization helpers.
//!
//! HTML forms and hand-written URLs often send `?status=&famille_id=` for
//! "no filter". These helpers turn empty strings into `None` instead of
//! failing the whole extractor.

use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Deserializes an optional string into an optional `i64`, treating `""` as `None`.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_parsed(deserializer)
}

/// Deserializes an optional string into an optional `bool`, treating `""` as `None`.
pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_parsed(deserializer)
}

/// Deserializes an optional string, treating `""` and whitespace as `None`.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

fn deserialize_optional_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<T>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        famille_id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        is_active: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        subject: Option<String>,
    }

    #[test]
    fn test_empty_strings_become_none() {
        let filters: Filters =
            serde_json::from_str(r#"{"famille_id":"","is_active":"","subject":"  "}"#).unwrap();
        assert_eq!(filters.famille_id, None);
        assert_eq!(filters.is_active, None);
        assert_eq!(filters.subject, None);
    }

    #[test]
    fn test_values_are_parsed() {
        let filters: Filters =
            serde_json::from_str(r#"{"famille_id":"42","is_active":"true","subject":"maths"}"#)
                .unwrap();
        assert_eq!(filters.famille_id, Some(42));
        assert_eq!(filters.is_active, Some(true));
        assert_eq!(filters.subject.as_deref(), Some("maths"));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let filters: Filters = serde_json::from_str("{}").unwrap();
        assert_eq!(filters.famille_id, None);
        assert_eq!(filters.is_active, None);
    }

    #[test]
    fn test_garbage_number_is_rejected() {
        let result: Result<Filters, _> = serde_json::from_str(r#"{"famille_id":"abc"}"#);
        assert!(result.is_err());
    }
}
