use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

use super::resource::ManagedResource;
use crate::client::{RestClient, RestError};

/// Interval between readiness and deletion probes.
pub const POLLING_INTERVAL: Duration = Duration::from_secs(1);

/// Failure modes of a readiness or deletion wait.
#[derive(Debug, Error)]
pub enum PollError {
    /// The configured timeout elapsed before the condition held.
    #[error("timed out after {after:?}: {last}")]
    TimedOut { after: Duration, last: String },

    /// The server reported a terminal failure; waiting longer cannot help.
    #[error("resource failed: {0}")]
    ResourceFailed(String),

    /// A read failed for a reason other than the wait condition.
    #[error(transparent)]
    Rest(#[from] RestError),
}

/// Poll until the resource reports ready, a terminal failure occurs, or the
/// timeout elapses. A zero timeout skips the wait entirely.
///
/// The state is re-read before every check after the first, so readiness
/// always evaluates current observed state. Cancellation is cooperative:
/// dropping the future stops the wait at the next suspension point.
pub async fn await_ready<T: ManagedResource>(
    client: &RestClient,
    state: &mut T,
    timeout: Duration,
) -> Result<(), PollError> {
    if timeout.is_zero() {
        debug!(resource_type = %T::TYPE, id = %state.id(), "readiness wait disabled");
        return Ok(());
    }
    let deadline = Instant::now() + timeout;
    let mut last = String::from("resource is not ready");
    loop {
        match state.check_ready(client).await {
            Ok(()) => {
                debug!(resource_type = %T::TYPE, id = %state.id(), "resource is ready");
                return Ok(());
            }
            Err(err) if err.is_terminal() => {
                return Err(PollError::ResourceFailed(err.to_string()));
            }
            Err(err) => {
                trace!(resource_type = %T::TYPE, id = %state.id(), reason = %err, "not ready yet");
                last = err.to_string();
            }
        }
        if Instant::now() >= deadline {
            return Err(PollError::TimedOut {
                after: timeout,
                last,
            });
        }
        sleep(POLLING_INTERVAL).await;
        if let Err(err) = state.read(client).await {
            // A transport timeout at the deadline is the wait expiring, not
            // a distinct failure.
            if err.is_timeout() && Instant::now() >= deadline {
                return Err(PollError::TimedOut {
                    after: timeout,
                    last,
                });
            }
            return Err(err.into());
        }
    }
}

/// Poll until a read returns 404 or the timeout elapses. A zero timeout
/// skips the wait entirely.
pub async fn await_deleted<T: ManagedResource>(
    client: &RestClient,
    state: &mut T,
    timeout: Duration,
) -> Result<(), PollError> {
    if timeout.is_zero() {
        debug!(resource_type = %T::TYPE, id = %state.id(), "deletion wait disabled");
        return Ok(());
    }
    let deadline = Instant::now() + timeout;
    loop {
        match state.read(client).await {
            Err(err) if err.is_not_found() => {
                debug!(resource_type = %T::TYPE, id = %state.id(), "resource is gone");
                return Ok(());
            }
            Err(err) if err.is_timeout() && Instant::now() >= deadline => {
                return Err(PollError::TimedOut {
                    after: timeout,
                    last: "resource still exists".to_string(),
                });
            }
            Err(err) => return Err(err.into()),
            Ok(()) => {}
        }
        if Instant::now() >= deadline {
            return Err(PollError::TimedOut {
                after: timeout,
                last: "resource still exists".to_string(),
            });
        }
        sleep(POLLING_INTERVAL).await;
    }
}
