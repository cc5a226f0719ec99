//! gRPC client for the remote user directory.

use std::time::Duration;

use async_trait::async_trait;
use authgate_protocol::user::GetUserByUsernameAndPasswordRequest;
use authgate_protocol::user::user_service_client::UserServiceClient;
use tonic::Code;
use tonic::transport::Channel;

use super::{ConnectPolicy, DirectoryError, UserDirectory, UserRecord, connect_channel};

/// Directory backed by `user.v1.UserService`.
///
/// Holds one channel for the life of the process. tonic multiplexes calls
/// over it, so the client is cloned per lookup instead of locked.
#[derive(Debug, Clone)]
pub struct RemoteUserDirectory {
    client: UserServiceClient<Channel>,
}

impl RemoteUserDirectory {
    /// Wrap an already-established channel.
    pub fn new(channel: Channel) -> Self {
        Self {
            client: UserServiceClient::new(channel),
        }
    }

    /// Connect to `address`, retrying per `policy`.
    pub async fn connect(
        address: &str,
        request_timeout: Duration,
        policy: ConnectPolicy,
    ) -> Result<Self, DirectoryError> {
        let channel = connect_channel(address, request_timeout, policy).await?;
        Ok(Self::new(channel))
    }
}

#[async_trait]
impl UserDirectory for RemoteUserDirectory {
    async fn lookup(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        let mut client = self.client.clone();
        let request = GetUserByUsernameAndPasswordRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = match client.get_user_by_username_and_password(request).await {
            Ok(response) => response.into_inner(),
            Err(status) if matches!(status.code(), Code::NotFound | Code::Unauthenticated) => {
                log::debug!("User directory rejected credentials: {}", status.message());
                return Ok(None);
            }
            Err(status) => {
                log::warn!("User directory call failed: {status}");
                return Err(DirectoryError::Rpc(status));
            }
        };

        match response.user {
            Some(user) if user.id.is_empty() => Err(DirectoryError::InvalidResponse(
                "user record without id".to_string(),
            )),
            Some(user) => Ok(Some(UserRecord {
                id: user.id,
                is_admin: user.is_admin,
            })),
            None => Ok(None),
        }
    }
}
