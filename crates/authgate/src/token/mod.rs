//! Token engine.
//!
//! Credentials are JWTs signed with HMAC-SHA256 over a shared secret. The
//! `sub` claim carries a [`Subject`] serialized to JSON and then base64
//! encoded, so structured identity rides inside the standard scalar field.
//! Existing token holders rely on that shape.
//!
//! There is no revocation store: a correctly signed credential is accepted
//! until its `exp`.

mod claims;
mod error;
mod service;

pub use claims::{Claims, Subject};
pub use error::TokenError;
pub use service::TokenService;
