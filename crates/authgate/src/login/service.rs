//! Turns a login request into a credential.

use std::sync::Arc;

use log::{debug, warn};

use super::{CreateTokenRequest, CreateTokenResponse, LoginError};
use crate::directory::UserDirectory;
use crate::token::{Subject, TokenService};

/// Coordinates validation, directory lookup and token issuance.
///
/// Each step runs once, in order, and the first failure ends the request.
/// Nothing is cached or retried here.
#[derive(Clone)]
pub struct LoginService {
    directory: Arc<dyn UserDirectory>,
    tokens: Arc<TokenService>,
}

impl LoginService {
    pub fn new(directory: Arc<dyn UserDirectory>, tokens: Arc<TokenService>) -> Self {
        Self { directory, tokens }
    }

    pub async fn create_token(
        &self,
        request: CreateTokenRequest,
    ) -> Result<CreateTokenResponse, LoginError> {
        request.validate()?;

        let user = self
            .directory
            .lookup(&request.username, &request.password)
            .await?
            .ok_or_else(|| {
                debug!(
                    "Login rejected for {:?}: unknown user or bad password",
                    request.username
                );
                LoginError::InvalidCredentials
            })?;

        let subject = Subject::new(user.id, user.is_admin);
        let token = self.tokens.issue(&subject).inspect_err(|e| {
            warn!("Failed to issue token for user {}: {e}", subject.user_id);
        })?;

        debug!("Issued token for user {}", subject.user_id);
        Ok(CreateTokenResponse { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{StaticUserDirectory, UserRecord};
    use crate::token::TokenError;
    use std::time::Duration;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new("test-secret", Duration::from_secs(3600)))
    }

    fn service(directory: Arc<StaticUserDirectory>) -> LoginService {
        LoginService::new(directory, tokens())
    }

    #[tokio::test]
    async fn test_successful_token_creation() {
        let directory = Arc::new(StaticUserDirectory::found(UserRecord::new("123", false)));
        let login = service(directory.clone());

        let response = login
            .create_token(CreateTokenRequest::new("validUser", "validPass"))
            .await
            .unwrap();

        let claims = tokens().parse(&response.token).unwrap();
        assert_eq!(claims.subject().unwrap(), Subject::new("123", false));
        assert_eq!(directory.calls(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_directory() {
        let directory = Arc::new(StaticUserDirectory::found(UserRecord::new("123", false)));
        let login = service(directory.clone());

        for request in [
            CreateTokenRequest::new("", "x"),
            CreateTokenRequest::new("validUser", ""),
        ] {
            let err = login.create_token(request).await.unwrap_err();
            assert!(matches!(err, LoginError::Validation(_)));
        }
        assert_eq!(directory.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_is_invalid_credentials() {
        let login = service(Arc::new(StaticUserDirectory::not_found()));

        let err = login
            .create_token(CreateTokenRequest::new("invalidUser", "invalidPass"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_directory_failure_is_directory_error() {
        let login = service(Arc::new(StaticUserDirectory::unavailable(
            "user service error",
        )));

        let err = login
            .create_token(CreateTokenRequest::new("validUser", "validPass"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Directory(_)));
    }

    #[tokio::test]
    async fn test_admin_flag_carried_into_token() {
        let login = service(Arc::new(StaticUserDirectory::found(UserRecord::new(
            "root", true,
        ))));

        let response = login
            .create_token(CreateTokenRequest::new("admin", "secret"))
            .await
            .unwrap();
        let claims = tokens().parse(&response.token).unwrap();
        assert!(claims.subject().unwrap().is_admin);
    }

    #[tokio::test]
    async fn test_token_rejected_by_other_secret() {
        let login = service(Arc::new(StaticUserDirectory::found(UserRecord::new(
            "123", false,
        ))));
        let response = login
            .create_token(CreateTokenRequest::new("validUser", "validPass"))
            .await
            .unwrap();

        let other = TokenService::new("another-secret", Duration::from_secs(3600));
        assert!(matches!(
            other.verify(&response.token).unwrap_err(),
            TokenError::InvalidSignature
        ));
    }
}
