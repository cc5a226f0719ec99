//! Test utilities and common setup.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use authgate::directory::{ConnectPolicy, RemoteUserDirectory, UserDirectory};
use authgate::login::LoginService;
use authgate::rpc::AuthRpc;
use authgate::token::TokenService;
use authgate_protocol::auth::auth_service_client::AuthServiceClient;
use authgate_protocol::user::user_service_server::{UserService, UserServiceServer};
use authgate_protocol::user::{
    GetUserByUsernameAndPasswordRequest, GetUserByUsernameAndPasswordResponse, User,
};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::{Request, Response, Status};

pub const TEST_SECRET: &str = "test-secret-for-integration-tests";

/// In-memory stand-in for `user.v1.UserService`.
///
/// | username  | password | answer                          |
/// |-----------|----------|---------------------------------|
/// | `alice`   | `secret` | user `123`, not admin           |
/// | `root`    | `toor`   | user `1`, admin                 |
/// | `nobody`  | any      | OK with no user                 |
/// | `ghost`   | any      | `NOT_FOUND`                     |
/// | `down`    | any      | `UNAVAILABLE`                   |
/// | `anon`    | any      | user with an empty id           |
/// | otherwise |          | `UNAUTHENTICATED`               |
///
/// A delay, when set, is slept before every answer.
#[derive(Debug, Default)]
pub struct FakeUserService {
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeUserService {
    pub fn slow(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Some(delay),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserService for FakeUserService {
    async fn get_user_by_username_and_password(
        &self,
        request: Request<GetUserByUsernameAndPasswordRequest>,
    ) -> Result<Response<GetUserByUsernameAndPasswordResponse>, Status> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let req = request.into_inner();

        let user = match (req.username.as_str(), req.password.as_str()) {
            ("alice", "secret") => Some(User {
                id: "123".to_string(),
                is_admin: false,
            }),
            ("root", "toor") => Some(User {
                id: "1".to_string(),
                is_admin: true,
            }),
            ("anon", _) => Some(User {
                id: String::new(),
                is_admin: false,
            }),
            ("nobody", _) => None,
            ("ghost", _) => return Err(Status::not_found("user not found")),
            ("down", _) => return Err(Status::unavailable("database offline")),
            _ => return Err(Status::unauthenticated("wrong password")),
        };

        Ok(Response::new(GetUserByUsernameAndPasswordResponse { user }))
    }
}

/// Serve the fake directory on an ephemeral loopback port.
pub async fn spawn_user_directory() -> (SocketAddr, Arc<FakeUserService>) {
    serve_user_directory(FakeUserService::default()).await
}

/// Serve a fake directory that answers only after `delay`.
pub async fn spawn_slow_user_directory(delay: Duration) -> (SocketAddr, Arc<FakeUserService>) {
    serve_user_directory(FakeUserService::slow(delay)).await
}

async fn serve_user_directory(fake: FakeUserService) -> (SocketAddr, Arc<FakeUserService>) {
    let fake = Arc::new(fake);
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind user directory listener");
    let addr = listener.local_addr().expect("user directory address");

    let service = UserServiceServer::from_arc(fake.clone());
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("user directory server");
    });

    (addr, fake)
}

/// Serve `AuthService` on an ephemeral loopback port.
pub async fn spawn_auth_server(directory: Arc<dyn UserDirectory>) -> SocketAddr {
    let tokens = Arc::new(TokenService::new(TEST_SECRET, Duration::from_secs(3600)));
    let login = Arc::new(LoginService::new(directory, tokens));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind auth listener");
    let addr = listener.local_addr().expect("auth address");

    let service = AuthRpc::new(login).into_server();
    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("auth server");
    });

    addr
}

/// A single attempt, so a broken setup fails fast instead of retrying.
pub fn quick_policy() -> ConnectPolicy {
    ConnectPolicy {
        max_attempts: 1,
        backoff: Duration::from_millis(10),
    }
}

pub async fn remote_directory(addr: SocketAddr) -> RemoteUserDirectory {
    remote_directory_with_timeout(addr, Duration::from_secs(5)).await
}

pub async fn remote_directory_with_timeout(
    addr: SocketAddr,
    request_timeout: Duration,
) -> RemoteUserDirectory {
    RemoteUserDirectory::connect(&addr.to_string(), request_timeout, quick_policy())
        .await
        .expect("connect to fake user directory")
}

pub async fn auth_client(addr: SocketAddr) -> AuthServiceClient<Channel> {
    AuthServiceClient::connect(format!("http://{addr}"))
        .await
        .expect("connect to auth server")
}

pub fn test_tokens() -> TokenService {
    TokenService::new(TEST_SECRET, Duration::from_secs(3600))
}
