//! gRPC transport for the login flow.

use std::sync::Arc;

use async_trait::async_trait;
use authgate_protocol::auth::auth_service_server::{AuthService, AuthServiceServer};
use authgate_protocol::auth::{LoginRequest, LoginResponse};
use log::info;
use tonic::{Request, Response, Status};

use crate::login::{CreateTokenRequest, LoginService};

/// `auth.v1.AuthService` backed by a [`LoginService`].
pub struct AuthRpc {
    login: Arc<LoginService>,
}

impl AuthRpc {
    pub fn new(login: Arc<LoginService>) -> Self {
        Self { login }
    }

    /// Wrap into the tonic service that can be mounted on a server.
    pub fn into_server(self) -> AuthServiceServer<Self> {
        AuthServiceServer::new(self)
    }
}

#[async_trait]
impl AuthService for AuthRpc {
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        info!("CALL: Login");
        let req = request.into_inner();

        let result = self
            .login
            .create_token(CreateTokenRequest::new(req.username, req.password))
            .await
            .map_err(Status::from)?;

        Ok(Response::new(LoginResponse {
            token: result.token,
        }))
    }
}
