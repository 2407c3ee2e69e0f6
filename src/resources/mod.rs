pub mod backup;
pub mod backup_policy;
pub mod database;
pub mod project;
pub mod user;

pub use backup::BackupState;
pub use backup_policy::BackupPolicyState;
pub use database::DatabaseState;
pub use project::ProjectState;
pub use user::UserState;

use crate::driver::ReadinessError;
use crate::model::resources::{ResourceStatus, State};
use crate::model::ResourceType;

/// Shared readiness rule for long-lived resources: ready when `Available`,
/// or when `Stopped` with maintenance disabled. `Failed` is terminal.
pub(crate) fn readiness_from_status(
    resource_type: ResourceType,
    id: &str,
    status: Option<&ResourceStatus>,
    maintenance_disabled: bool,
    require_ready_flag: bool,
) -> Result<(), ReadinessError> {
    let Some(status) = status else {
        return Err(ReadinessError::NotReady(format!(
            "{} {} has no status yet",
            resource_type, id
        )));
    };
    match status.state {
        Some(State::Failed) => Err(ReadinessError::Failed(format!(
            "{} {}: {}",
            resource_type,
            id,
            status.message.as_deref().unwrap_or("no details available")
        ))),
        Some(State::Available) => {
            if require_ready_flag && status.ready != Some(true) {
                Err(ReadinessError::NotReady(format!(
                    "{} {} is not ready yet",
                    resource_type, id
                )))
            } else {
                Ok(())
            }
        }
        Some(State::Stopped) if maintenance_disabled => Ok(()),
        other => Err(ReadinessError::NotReady(format!(
            "{} {} is not ready: state is {}",
            resource_type,
            id,
            other.map(|s| s.to_string()).unwrap_or_else(|| "unset".to_string())
        ))),
    }
}
