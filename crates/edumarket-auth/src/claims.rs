use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// `role` is the lowercase role name (`famille`, `enseignant`,
/// `administrator`). It is kept as a string here so this crate stays
/// independent of the domain model; the server parses it when it needs the
/// typed role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID as a string (subject claim)
    pub sub: String,
    /// User ID
    pub user_id: i64,
    /// Role name of the user
    pub role: String,
    /// Issuer
    pub iss: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Not before (Unix timestamp)
    pub nbf: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "7".to_string(),
            user_id: 7,
            role: "enseignant".to_string(),
            iss: "educational-platform-api".to_string(),
            exp: 1234567890,
            iat: 1234567800,
            nbf: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""user_id":7"#));
        assert!(serialized.contains(r#""role":"enseignant""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"3","user_id":3,"role":"famille","iss":"x","exp":9999999999,"iat":1,"nbf":1}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.role, "famille");
        assert_eq!(claims.exp, 9999999999);
    }
}
