use serde_json::Value;

use crate::plan::Severity;

/// The thin seam through which the core talks to the orchestrator. One
/// instance represents a single in-flight request for a single resource;
/// the three getters are projections of that request.
pub trait Orchestrator: Send {
    /// The user's raw configuration for the resource.
    fn get_from_config(&self) -> anyhow::Result<Value>;

    /// The planned (desired) value after plan modifiers ran.
    fn get_from_plan(&self) -> anyhow::Result<Value>;

    /// The value persisted after the last apply or refresh.
    fn get_from_state(&self) -> anyhow::Result<Value>;

    /// Persist the resource's representation.
    fn set_state(&mut self, value: Value) -> anyhow::Result<()>;

    /// Drop the resource from state; used when a read observes a 404.
    fn remove_from_state(&mut self);

    /// Surface a user-visible message.
    fn add_diagnostic(&mut self, severity: Severity, summary: &str, detail: &str);
}
