pub mod operations;
pub mod orchestrator;
pub mod poller;
pub mod resource;

pub use operations::Driver;
pub use orchestrator::Orchestrator;
pub use poller::{await_deleted, await_ready, PollError, POLLING_INTERVAL};
pub use resource::{update_with_conflict_retry, ManagedResource, ReadinessError};
