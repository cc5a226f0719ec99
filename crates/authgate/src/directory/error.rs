//! User directory errors.

use thiserror::Error;

/// Failures reaching or talking to the user directory.
///
/// A directory that answers "no such user" is not an error; see
/// [`super::UserDirectory::lookup`].
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The configured address is not a usable endpoint.
    #[error("invalid directory address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A single connection attempt failed.
    #[error("failed to connect to user directory: {0}")]
    Connect(String),

    /// Every connection attempt failed.
    #[error("user directory at {target} unreachable after {attempts} attempts: {last}")]
    Unreachable {
        target: String,
        attempts: u32,
        last: String,
    },

    /// The lookup call itself failed.
    #[error("user directory call failed: {0}")]
    Rpc(#[from] tonic::Status),

    /// The directory returned something that is not a user record.
    #[error("invalid user directory response: {0}")]
    InvalidResponse(String),
}
