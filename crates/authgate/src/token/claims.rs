//! Credential claims and the subject payload they carry.

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::TokenError;

/// Identity payload embedded in a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub user_id: String,
    pub is_admin: bool,
}

impl Subject {
    pub fn new(user_id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
        }
    }

    /// Encode into the opaque `sub` form: unpadded standard base64 of the JSON.
    pub fn encode(&self) -> Result<String, TokenError> {
        let json = serde_json::to_vec(self).map_err(|e| TokenError::Signing(e.to_string()))?;
        Ok(STANDARD_NO_PAD.encode(json))
    }

    /// Reverse of [`Subject::encode`].
    pub fn decode(opaque: &str) -> Result<Self, TokenError> {
        let json = STANDARD_NO_PAD
            .decode(opaque)
            .map_err(|e| TokenError::Decode(format!("subject is not valid base64: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| TokenError::Decode(format!("subject is not valid JSON: {e}")))
    }
}

/// Signed content of a credential.
///
/// `sub` never holds a raw user id, it holds an encoded [`Subject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    #[serde(rename = "iss", default, skip_serializing_if = "String::is_empty")]
    pub issuer: String,

    /// Audience.
    #[serde(rename = "aud", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub audience: BTreeSet<String>,

    /// Issued at (Unix seconds).
    #[serde(rename = "iat", default)]
    pub issued_at: i64,

    /// Not before (Unix seconds).
    #[serde(rename = "nbf", default)]
    pub not_before: i64,

    /// Expiration time (Unix seconds).
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Per-credential unique id (JWT ID).
    #[serde(rename = "jti")]
    pub identity: String,

    /// Encoded subject.
    #[serde(rename = "sub")]
    pub subject: String,
}

impl Claims {
    /// Check expiry against the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// A credential expiring at exactly `now` is still valid.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }

    /// Decode the embedded subject.
    pub fn subject(&self) -> Result<Subject, TokenError> {
        Subject::decode(&self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(expires_at: i64) -> Claims {
        Claims {
            issuer: String::new(),
            audience: BTreeSet::new(),
            issued_at: 0,
            not_before: 0,
            expires_at,
            identity: "id-1".to_string(),
            subject: Subject::new("123", false).encode().unwrap(),
        }
    }

    #[test]
    fn test_subject_encode_decode() {
        let subject = Subject::new("user-42", true);
        let encoded = subject.encode().unwrap();

        assert!(!encoded.ends_with('='));
        assert_eq!(Subject::decode(&encoded).unwrap(), subject);
    }

    #[test]
    fn test_subject_wire_shape() {
        let encoded = Subject::new("123", false).encode().unwrap();
        let json = STANDARD_NO_PAD.decode(encoded).unwrap();
        assert_eq!(
            String::from_utf8(json).unwrap(),
            r#"{"userId":"123","isAdmin":false}"#
        );
    }

    #[test]
    fn test_subject_decode_invalid_base64() {
        let err = Subject::decode("invalid_base64_string").unwrap_err();
        assert!(matches!(err, TokenError::Decode(_)));
    }

    #[test]
    fn test_subject_decode_invalid_json() {
        let opaque = STANDARD_NO_PAD.encode("invalid_json");
        let err = Subject::decode(&opaque).unwrap_err();
        assert!(matches!(err, TokenError::Decode(_)));
    }

    #[test]
    fn test_is_expired_boundary() {
        let claims = sample_claims(1_000);
        assert!(!claims.is_expired_at(999));
        assert!(!claims.is_expired_at(1_000));
        assert!(claims.is_expired_at(1_001));
    }

    #[test]
    fn test_is_expired_against_clock() {
        let now = Utc::now().timestamp();
        assert!(!sample_claims(now + 3600).is_expired());
        assert!(sample_claims(now - 10).is_expired());
    }

    #[test]
    fn test_empty_issuer_and_audience_omitted() {
        let json = serde_json::to_value(sample_claims(10)).unwrap();
        assert!(json.get("iss").is_none());
        assert!(json.get("aud").is_none());
        assert_eq!(json["exp"], 10);
        assert_eq!(json["jti"], "id-1");
    }

    #[test]
    fn test_claims_subject() {
        let claims = sample_claims(10);
        assert_eq!(claims.subject().unwrap(), Subject::new("123", false));
    }
}
