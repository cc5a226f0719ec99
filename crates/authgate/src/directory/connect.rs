//! Startup connection to the remote user directory.
//!
//! The retry schedule is fixed: a constant wait between attempts, no jitter,
//! no growth. Exhausting the attempts is fatal for the caller.

use std::future::Future;
use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

use super::DirectoryError;

/// Attempts made before giving up.
pub const DEFAULT_CONNECT_ATTEMPTS: u32 = 10;

/// Wait between attempts.
pub const DEFAULT_CONNECT_BACKOFF: Duration = Duration::from_secs(2);

/// Bounded, fixed-delay connection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for ConnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_CONNECT_ATTEMPTS,
            backoff: DEFAULT_CONNECT_BACKOFF,
        }
    }
}

/// Run `attempt` until it succeeds or the policy is exhausted.
///
/// `attempt` receives the 1-based attempt number. The wait happens between
/// attempts only, so `max_attempts` failures cost `max_attempts - 1` waits.
pub async fn connect_with_retry<T, F, Fut>(
    policy: ConnectPolicy,
    target: &str,
    mut attempt: F,
) -> Result<T, DirectoryError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, DirectoryError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = None;

    for n in 1..=max_attempts {
        match attempt(n).await {
            Ok(value) => {
                if n > 1 {
                    tracing::info!("Connected to user directory at {target} on attempt {n}");
                }
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(
                    "User directory connection attempt {n}/{max_attempts} to {target} failed: {e}"
                );
                last_error = Some(e);
            }
        }

        if n < max_attempts {
            tokio::time::sleep(policy.backoff).await;
        }
    }

    Err(DirectoryError::Unreachable {
        target: target.to_string(),
        attempts: max_attempts,
        last: last_error.map(|e| e.to_string()).unwrap_or_default(),
    })
}

/// Build the endpoint for `address`, adding `http://` when no scheme is given.
pub fn endpoint(address: &str, request_timeout: Duration) -> Result<Endpoint, DirectoryError> {
    let uri = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };

    let endpoint = Endpoint::from_shared(uri).map_err(|e| DirectoryError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })?;

    Ok(endpoint
        .connect_timeout(request_timeout)
        .timeout(request_timeout))
}

/// Open a channel to the directory, retrying per `policy`.
pub async fn connect_channel(
    address: &str,
    request_timeout: Duration,
    policy: ConnectPolicy,
) -> Result<Channel, DirectoryError> {
    let endpoint = endpoint(address, request_timeout)?;
    let target = endpoint.uri().to_string();

    connect_with_retry(policy, &target, |_| {
        let endpoint = endpoint.clone();
        async move {
            endpoint
                .connect()
                .await
                .map_err(|e| DirectoryError::Connect(e.to_string()))
        }
    })
    .await
}
