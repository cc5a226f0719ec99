//! gRPC wire types for authgate.
//!
//! The message types and service stubs mirror the `.proto` files under
//! `proto/`. They are written out by hand so the workspace builds without a
//! `protoc` toolchain.
//!
//! ```text
//! client --auth.v1.AuthService/Login--> authgate --user.v1.UserService--> user directory
//! ```

pub mod auth;
pub mod user;
