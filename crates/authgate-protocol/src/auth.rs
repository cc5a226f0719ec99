//! `auth.v1.AuthService` - the public login surface.

/// Login request carrying the caller's credentials.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginRequest {
    #[prost(string, tag = "1")]
    pub username: String,

    #[prost(string, tag = "2")]
    pub password: String,
}

/// Login response carrying the signed credential.
#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginResponse {
    #[prost(string, tag = "1")]
    pub token: String,
}

pub const SERVICE_NAME: &str = "auth.v1.AuthService";
const LOGIN_PATH: &str = "/auth.v1.AuthService/Login";

/// Client stub for `auth.v1.AuthService`.
pub mod auth_service_client {
    use super::*;
    use tonic::codegen::*;

    /// AuthService RPC client
    #[derive(Debug, Clone)]
    pub struct AuthServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl AuthServiceClient<tonic::transport::Channel> {
        /// Connect to the given endpoint.
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> AuthServiceClient<T>
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

        /// Exchange a username/password pair for a credential.
        pub async fn login(
            &mut self,
            request: impl tonic::IntoRequest<LoginRequest>,
        ) -> std::result::Result<tonic::Response<LoginResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;

            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(LOGIN_PATH);
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new(SERVICE_NAME, "Login"));
            self.inner.unary(req, path, codec).await
        }
    }
}

/// Server stub for `auth.v1.AuthService`.
pub mod auth_service_server {
    use super::*;
    use tonic::codegen::*;

    /// Implemented by the login transport adapter.
    #[async_trait::async_trait]
    pub trait AuthService: std::marker::Send + std::marker::Sync + 'static {
        async fn login(
            &self,
            request: tonic::Request<LoginRequest>,
        ) -> std::result::Result<tonic::Response<LoginResponse>, tonic::Status>;
    }

    #[derive(Debug)]
    pub struct AuthServiceServer<T: AuthService> {
        inner: Arc<T>,
    }

    impl<T: AuthService> AuthServiceServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }

        pub fn from_arc(inner: Arc<T>) -> Self {
            Self { inner }
        }
    }

    impl<T: AuthService> Clone for AuthServiceServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }

    impl<T: AuthService> tonic::server::NamedService for AuthServiceServer<T> {
        const NAME: &'static str = SERVICE_NAME;
    }

    impl<T, B> tonic::codegen::Service<http::Request<B>> for AuthServiceServer<T>
    where
        T: AuthService,
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
                LOGIN_PATH => Box::pin(async move {
                    let mut grpc = tonic::server::Grpc::new(tonic::codec::ProstCodec::default());
                    let res = grpc.unary(LoginSvc(inner), req).await;
                    Ok(res)
                }),
                _ => Box::pin(async move { Ok(unimplemented_response()) }),
            }
        }
    }

    struct LoginSvc<T: AuthService>(Arc<T>);

    impl<T: AuthService> tonic::server::UnaryService<LoginRequest> for LoginSvc<T> {
        type Response = LoginResponse;
        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

        fn call(&mut self, request: tonic::Request<LoginRequest>) -> Self::Future {
            let inner = self.0.clone();
            Box::pin(async move { inner.login(request).await })
        }
    }

    fn unimplemented_response() -> http::Response<tonic::body::BoxBody> {
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
        response
    }
}
