//! Login request and response shapes.

use serde::{Deserialize, Serialize};

use super::LoginError;

/// Credentials presented by a caller.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateTokenRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CreateTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateTokenRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CreateTokenRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-empty.
    pub fn validate(&self) -> Result<(), LoginError> {
        if self.username.is_empty() {
            return Err(LoginError::Validation("username is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(LoginError::Validation("password is required".to_string()));
        }
        Ok(())
    }
}

/// A freshly issued credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTokenResponse {
    pub token: String,
}
