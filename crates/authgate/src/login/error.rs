//! Login errors.

use thiserror::Error;

use crate::directory::DirectoryError;
use crate::token::TokenError;

/// Why a login did not produce a credential.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The request is missing a required field.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The directory answered and did not recognise the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The directory could not be asked.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The token engine failed to sign.
    #[error(transparent)]
    Signing(#[from] TokenError),
}

impl From<LoginError> for tonic::Status {
    fn from(err: LoginError) -> Self {
        match &err {
            LoginError::Validation(_) => tonic::Status::invalid_argument(err.to_string()),
            LoginError::InvalidCredentials => tonic::Status::unauthenticated(err.to_string()),
            LoginError::Directory(_) => tonic::Status::unavailable("user directory unavailable"),
            LoginError::Signing(_) => tonic::Status::internal("failed to issue token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_login_error_display() {
        assert_eq!(
            LoginError::InvalidCredentials.to_string(),
            "invalid credentials"
        );
        assert_eq!(
            LoginError::Validation("username is required".to_string()).to_string(),
            "invalid request: username is required"
        );
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                LoginError::Validation("username is required".to_string()),
                Code::InvalidArgument,
            ),
            (LoginError::InvalidCredentials, Code::Unauthenticated),
            (
                LoginError::Directory(DirectoryError::Connect("refused".to_string())),
                Code::Unavailable,
            ),
            (
                LoginError::Signing(TokenError::Signing("bad key".to_string())),
                Code::Internal,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(tonic::Status::from(err).code(), code);
        }
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let status = tonic::Status::from(LoginError::Directory(DirectoryError::Connect(
            "dial tcp 10.0.0.7:50052".to_string(),
        )));
        assert!(!status.message().contains("10.0.0.7"));
    }
}
