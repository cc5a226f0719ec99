//! Credential issuance.
//!
//! ```text
//! request -> validate -> directory lookup -> subject -> token -> response
//! ```
//!
//! An empty username or password never reaches the directory. A directory
//! that cannot be reached ([`LoginError::Directory`]) is kept apart from one
//! that answers "no such user" ([`LoginError::InvalidCredentials`]): callers
//! see different messages and operators alert on different things.

mod error;
mod request;
mod service;

pub use error::LoginError;
pub use request::{CreateTokenRequest, CreateTokenResponse};
pub use service::LoginService;
