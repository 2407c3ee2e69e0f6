use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::orchestrator::Orchestrator;
use super::poller;
use super::resource::ManagedResource;
use crate::config::{Bundle, Operation};

/// The generic resource driver. Executes each orchestrator-initiated
/// operation against the capability contract of a resource adapter.
pub struct Driver<'a> {
    bundle: &'a Bundle,
}

impl<'a> Driver<'a> {
    pub fn new(bundle: &'a Bundle) -> Self {
        Self { bundle }
    }

    /// Create the resource from the planned state, then wait for readiness.
    ///
    /// The state is persisted before the readiness wait begins, so a timeout
    /// does not orphan a resource the server already accepted.
    pub async fn create<T: ManagedResource>(&self, orch: &mut dyn Orchestrator) -> Result<()> {
        let mut state: T = decode(orch.get_from_plan()?)?;
        info!(resource_type = %T::TYPE, id = %state.id(), "creating resource");
        state
            .create(&self.bundle.client)
            .await
            .with_context(|| format!("failed to create {} {}", T::TYPE, state.id()))?;
        state
            .read(&self.bundle.client)
            .await
            .with_context(|| format!("failed to read back {} {}", T::TYPE, state.id()))?;
        orch.set_state(encode(&state)?)?;
        let timeout = self.bundle.timeouts.resolve(T::TYPE, Operation::Create);
        self.finish_write(orch, &mut state, timeout).await
    }

    /// Refresh local state from the server. A 404 means the resource was
    /// removed out-of-band; it is dropped from state without error.
    pub async fn read<T: ManagedResource>(&self, orch: &mut dyn Orchestrator) -> Result<()> {
        let mut state: T = decode(orch.get_from_state()?)?;
        match state.read(&self.bundle.client).await {
            Ok(()) => {
                orch.set_state(encode(&state)?)?;
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                debug!(resource_type = %T::TYPE, id = %state.id(), "resource removed out-of-band");
                orch.remove_from_state();
                Ok(())
            }
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {} {}", T::TYPE, state.id()))
            }
        }
    }

    /// Drive the resource to the planned state with the optimistic-update
    /// loop, then wait for readiness. One update deadline covers both: the
    /// conflict loop is bounded by it and the readiness wait gets whatever
    /// is left. A zero timeout leaves the loop uncapped and skips the wait.
    pub async fn update<T: ManagedResource>(&self, orch: &mut dyn Orchestrator) -> Result<()> {
        let mut desired: T = decode(orch.get_from_plan()?)?;
        let prior: T = decode(orch.get_from_state()?)?;
        info!(resource_type = %T::TYPE, id = %desired.id(), "updating resource");

        let timeout = self.bundle.timeouts.resolve(T::TYPE, Operation::Update);
        let started = Instant::now();
        let apply = desired.update(&self.bundle.client, &prior);
        if timeout.is_zero() {
            apply
                .await
                .with_context(|| format!("failed to update {} {}", T::TYPE, prior.id()))?;
        } else {
            tokio::time::timeout(timeout, apply)
                .await
                .map_err(|_| {
                    anyhow!(
                        "timed out after {:?} updating {} {}",
                        timeout,
                        T::TYPE,
                        prior.id()
                    )
                })?
                .with_context(|| format!("failed to update {} {}", T::TYPE, prior.id()))?;
        }

        desired
            .read(&self.bundle.client)
            .await
            .with_context(|| format!("failed to read back {} {}", T::TYPE, prior.id()))?;
        orch.set_state(encode(&desired)?)?;

        let remaining = if timeout.is_zero() {
            Duration::ZERO
        } else {
            let remaining = timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(anyhow!(
                    "timed out after {:?}: {} {} did not become ready",
                    timeout,
                    T::TYPE,
                    prior.id()
                ));
            }
            remaining
        };
        self.finish_write(orch, &mut desired, remaining).await
    }

    /// Delete the resource and wait for the server to finish tearing it
    /// down, then drop it from state.
    pub async fn delete<T: ManagedResource>(&self, orch: &mut dyn Orchestrator) -> Result<()> {
        let state: T = decode(orch.get_from_state()?)?;
        info!(resource_type = %T::TYPE, id = %state.id(), "deleting resource");
        state
            .delete(&self.bundle.client)
            .await
            .with_context(|| format!("failed to delete {} {}", T::TYPE, state.id()))?;

        let timeout = self.bundle.timeouts.resolve(T::TYPE, Operation::Delete);
        let mut probe = state.clone();
        poller::await_deleted(&self.bundle.client, &mut probe, timeout)
            .await
            .with_context(|| format!("failed to delete {} {}", T::TYPE, state.id()))?;
        orch.remove_from_state();
        Ok(())
    }

    /// Seed state from a slash-delimited identity. Only identity fields are
    /// populated; the next read fills in the rest.
    pub async fn import<T: ManagedResource>(
        &self,
        orch: &mut dyn Orchestrator,
        id: &str,
    ) -> Result<()> {
        let mut state = T::default();
        state
            .set_id(id)
            .with_context(|| format!("failed to import {} '{}'", T::TYPE, id))?;
        orch.set_state(encode(&state)?)?;
        Ok(())
    }

    /// Persist the final observed state after a readiness wait, whether the
    /// wait succeeded or not.
    async fn finish_write<T: ManagedResource>(
        &self,
        orch: &mut dyn Orchestrator,
        state: &mut T,
        timeout: Duration,
    ) -> Result<()> {
        let outcome = poller::await_ready(&self.bundle.client, state, timeout).await;
        orch.set_state(encode(state)?)?;
        outcome.with_context(|| format!("{} {} did not become ready", T::TYPE, state.id()))
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).context("failed to decode resource state")
}

fn encode<T: Serialize>(state: &T) -> Result<Value> {
    serde_json::to_value(state).context("failed to encode resource state")
}
