//! User directory capability.
//!
//! The login flow resolves a username/password pair through a
//! [`UserDirectory`]. Two implementations are chosen between at startup:
//!
//! - [`RemoteUserDirectory`] talks to `user.v1.UserService` over gRPC
//! - [`StaticUserDirectory`] answers from memory (tests, local development)

mod connect;
mod error;
mod fixed;
mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use connect::{
    ConnectPolicy, DEFAULT_CONNECT_ATTEMPTS, DEFAULT_CONNECT_BACKOFF, connect_channel,
    connect_with_retry, endpoint,
};
pub use error::DirectoryError;
pub use fixed::StaticUserDirectory;
pub use remote::RemoteUserDirectory;

/// A user as reported by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub is_admin: bool,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            id: id.into(),
            is_admin,
        }
    }
}

/// Resolves credentials to a user.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up the user owning `username`/`password`.
    ///
    /// `Ok(None)` means the directory answered and found no match. `Err` means
    /// the directory could not be asked. Implementations do not retry.
    async fn lookup(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, DirectoryError>;
}
