//! Token engine errors.

use thiserror::Error;

/// Errors produced while issuing or reading a credential.
///
/// `Malformed` and `UnsupportedAlgorithm` are parse failures, raised before
/// the signature is looked at.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Serializing the subject or signing the claims failed.
    #[error("failed to sign token: {0}")]
    Signing(String),

    /// The credential does not have the `header.claims.signature` shape.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The header names an algorithm outside the HMAC family.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The message-authentication tag does not match.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The claims or the embedded subject could not be decoded.
    #[error("failed to decode token content: {0}")]
    Decode(String),
}

impl TokenError {
    /// True for failures raised while splitting or checking the header.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            TokenError::Malformed(_) | TokenError::UnsupportedAlgorithm(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_display() {
        let err = TokenError::UnsupportedAlgorithm("RS256".to_string());
        assert_eq!(err.to_string(), "unsupported signing algorithm: RS256");

        assert_eq!(
            TokenError::InvalidSignature.to_string(),
            "invalid token signature"
        );
    }

    #[test]
    fn test_parse_error_family() {
        assert!(TokenError::Malformed("x".to_string()).is_parse_error());
        assert!(TokenError::UnsupportedAlgorithm("none".to_string()).is_parse_error());
        assert!(!TokenError::InvalidSignature.is_parse_error());
        assert!(!TokenError::Decode("x".to_string()).is_parse_error());
    }
}
