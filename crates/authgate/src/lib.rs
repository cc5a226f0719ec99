//! authgate
//!
//! Issues signed, time-limited credentials to callers whose username and
//! password are confirmed by a remote user directory.

pub mod config;
pub mod directory;
pub mod login;
pub mod rpc;
pub mod token;
