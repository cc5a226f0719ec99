//! In-memory directory with a fixed answer.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{DirectoryError, UserDirectory, UserRecord};

/// What every lookup returns.
#[derive(Debug, Clone)]
enum Outcome {
    Found(UserRecord),
    NotFound,
    Unavailable(String),
}

/// Directory that returns the same configured outcome for every lookup.
///
/// Used in development mode and as the test double for the login flow. It
/// counts calls so callers can check whether the directory was reached.
#[derive(Debug)]
pub struct StaticUserDirectory {
    outcome: Outcome,
    calls: AtomicUsize,
}

impl StaticUserDirectory {
    /// Every lookup resolves to `user`.
    pub fn found(user: UserRecord) -> Self {
        Self::with_outcome(Outcome::Found(user))
    }

    /// Every lookup reports no matching user.
    pub fn not_found() -> Self {
        Self::with_outcome(Outcome::NotFound)
    }

    /// Every lookup fails as if the directory were unreachable.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Unavailable(message.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn lookup(
        &self,
        _username: &str,
        _password: &str,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.outcome {
            Outcome::Found(user) => Ok(Some(user.clone())),
            Outcome::NotFound => Ok(None),
            Outcome::Unavailable(message) => {
                Err(tonic::Status::unavailable(message.clone()).into())
            }
        }
    }
}
