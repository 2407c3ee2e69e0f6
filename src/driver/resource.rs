use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::client::{RestClient, RestError};
use crate::model::ResourceType;

// ─── Readiness ──────────────────────────────────────────────────────────────

/// Outcome of a failed readiness check.
#[derive(Debug, Error)]
pub enum ReadinessError {
    /// Terminal failure; polling stops immediately.
    #[error("resource failed: {0}")]
    Failed(String),

    /// Not ready yet; checked again after the polling interval.
    #[error("{0}")]
    NotReady(String),

    /// An auxiliary probe failed; retried like not-ready.
    #[error(transparent)]
    Rest(#[from] RestError),
}

impl ReadinessError {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReadinessError::Failed(_))
    }
}

// ─── Capability Contract ────────────────────────────────────────────────────

/// The capability contract every resource adapter implements. The generic
/// driver and the poller operate exclusively through this trait.
///
/// A state object is freshly built per orchestrator call and never shared
/// between resources; the `RestClient` is the only shared collaborator.
#[async_trait]
pub trait ManagedResource:
    Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const TYPE: ResourceType;

    /// Zero the local state.
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Populate identity fields from a slash-delimited id, zeroing all other
    /// fields. Fails on wrong arity or an empty component.
    fn set_id(&mut self, id: &str) -> Result<(), RestError>;

    /// Canonical slash-delimited identity.
    fn id(&self) -> String;

    /// Server-assigned version echoed on update to detect concurrent writes.
    fn resource_version(&self) -> Option<String>;
    fn set_resource_version(&mut self, version: Option<String>);

    /// POST/PUT the spec to create the resource. On success the server has
    /// accepted the request and begun reconciliation.
    async fn create(&self, client: &RestClient) -> Result<(), RestError>;

    /// Overwrite local state from the server. Write-only fields (passwords)
    /// are preserved, since the server never returns them.
    async fn read(&mut self, client: &RestClient) -> Result<(), RestError>;

    /// Issue a single PUT of the current spec, echoing `resource_version`.
    /// Write-only fields are scrubbed from the payload by the adapter.
    async fn put(&self, client: &RestClient) -> Result<(), RestError>;

    /// Drive the spec to the desired state using the optimistic-concurrency
    /// loop. Adapters with write-only sub-operations override this.
    async fn update(&mut self, client: &RestClient, _prior: &Self) -> Result<(), RestError> {
        update_with_conflict_retry(client, self).await
    }

    /// Issue the delete; the server completes it asynchronously.
    async fn delete(&self, client: &RestClient) -> Result<(), RestError>;

    /// Nil iff the resource is ready per its type-specific rule. May issue
    /// an auxiliary probe through `client`.
    async fn check_ready(&self, client: &RestClient) -> Result<(), ReadinessError>;
}

// ─── Optimistic Update ──────────────────────────────────────────────────────

/// The optimistic-concurrency write loop: refetch the server's current
/// resource version, echo it on the PUT, and start over whenever a
/// concurrent write invalidates it. The loop has no retry cap of its own;
/// the enclosing operation timeout bounds it.
pub async fn update_with_conflict_retry<T: ManagedResource>(
    client: &RestClient,
    desired: &mut T,
) -> Result<(), RestError> {
    loop {
        // Read into a scratch copy so the desired spec is not clobbered.
        let mut current = desired.clone();
        current.read(client).await?;
        desired.set_resource_version(current.resource_version());

        match desired.put(client).await {
            Ok(()) => return Ok(()),
            Err(err) if err.is_concurrent_update() => {
                debug!(
                    resource_type = %T::TYPE,
                    id = %desired.id(),
                    "resource version is stale, refetching"
                );
            }
            Err(err) => return Err(err),
        }
    }
}
