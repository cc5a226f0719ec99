//! `user.v1.UserService` - the remote user directory.
//!
//! authgate only consumes this service. The server half exists so tests and
//! local setups can stand up a directory without the real one.

#[derive(Clone, PartialEq, prost::Message)]
pub struct User {
    #[prost(string, tag = "1")]
    pub id: String,

    #[prost(bool, tag = "2")]
    pub is_admin: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetUserByUsernameAndPasswordRequest {
    #[prost(string, tag = "1")]
    pub username: String,

    #[prost(string, tag = "2")]
    pub password: String,
}

/// Lookup result. An absent `user` means the directory found no match.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GetUserByUsernameAndPasswordResponse {
    #[prost(message, optional, tag = "1")]
    pub user: Option<User>,
}

pub const SERVICE_NAME: &str = "user.v1.UserService";
const GET_USER_PATH: &str = "/user.v1.UserService/GetUserByUsernameAndPassword";

/// Client stub for `user.v1.UserService`.
pub mod user_service_client {
    use super::*;
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct UserServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> UserServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub async fn get_user_by_username_and_password(
            &mut self,
            request: impl tonic::IntoRequest<GetUserByUsernameAndPasswordRequest>,
        ) -> std::result::Result<
            tonic::Response<GetUserByUsernameAndPasswordResponse>,
            tonic::Status,
        > {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;

            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(GET_USER_PATH);
            let mut req = request.into_request();
            req.extensions_mut().insert(GrpcMethod::new(
                SERVICE_NAME,
                "GetUserByUsernameAndPassword",
            ));
            self.inner.unary(req, path, codec).await
        }
    }
}

/// Server stub for `user.v1.UserService`.
pub mod user_service_server {
    use super::*;
    use tonic::codegen::*;

    #[async_trait::async_trait]
    pub trait UserService: std::marker::Send + std::marker::Sync + 'static {
        async fn get_user_by_username_and_password(
            &self,
            request: tonic::Request<GetUserByUsernameAndPasswordRequest>,
        ) -> std::result::Result<
            tonic::Response<GetUserByUsernameAndPasswordResponse>,
            tonic::Status,
        >;
    }

    #[derive(Debug)]
    pub struct UserServiceServer<T: UserService> {
        inner: Arc<T>,
    }

    impl<T: UserService> UserServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self {
                inner: Arc::new(inner),
            }
        }

        pub fn from_arc(inner: Arc<T>) -> Self {
            Self { inner }
        }
    }

    impl<T: UserService> Clone for UserServiceServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }

    impl<T: UserService> tonic::server::NamedService for UserServiceServer<T> {
        const NAME: &'static str = SERVICE_NAME;
    }

    impl<T, B> tonic::codegen::Service<http::Request<B>> for UserServiceServer<T>
    where
        T: UserService,
        B: Body + std::marker::Send + 'static,
        B::Error: Into<StdError> + std::marker::Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(
            &mut self,
            _cx: &mut Context<'_>,
        ) -> Poll<std::result::Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();

            match req.uri().path() {
                GET_USER_PATH => Box::pin(async move {
                    let mut grpc = tonic::server::Grpc::new(tonic::codec::ProstCodec::default());
                    let res = grpc.unary(GetUserSvc(inner), req).await;
                    Ok(res)
                }),
                _ => Box::pin(async move {
                    let mut response = http::Response::new(tonic::body::empty_body());
                    let headers = response.headers_mut();
                    headers.insert(
                        "grpc-status",
                        http::HeaderValue::from(tonic::Code::Unimplemented as i32),
                    );
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        http::HeaderValue::from_static("application/grpc"),
                    );
                    Ok(response)
                }),
            }
        }
    }

    struct GetUserSvc<T: UserService>(Arc<T>);

    impl<T: UserService> tonic::server::UnaryService<GetUserByUsernameAndPasswordRequest>
        for GetUserSvc<T>
    {
        type Response = GetUserByUsernameAndPasswordResponse;
        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

        fn call(
            &mut self,
            request: tonic::Request<GetUserByUsernameAndPasswordRequest>,
        ) -> Self::Future {
            let inner = self.0.clone();
            Box::pin(async move { inner.get_user_by_username_and_password(request).await })
        }
    }
}
