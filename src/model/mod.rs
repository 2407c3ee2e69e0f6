pub mod identity;
pub mod resources;

use std::fmt;
use std::str::FromStr;

/// The resource types managed through the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Project,
    Database,
    Backup,
    BackupPolicy,
    User,
}

impl ResourceType {
    /// Key used in timeout policies and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Project => "project",
            ResourceType::Database => "database",
            ResourceType::Backup => "backup",
            ResourceType::BackupPolicy => "backuppolicy",
            ResourceType::User => "user",
        }
    }

    /// Leading path segment of the type's REST endpoints.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ResourceType::Project => "projects",
            ResourceType::Database => "databases",
            ResourceType::Backup => "backups",
            ResourceType::BackupPolicy => "backuppolicies",
            ResourceType::User => "users",
        }
    }

    /// Number of slash-delimited identity components.
    pub fn identity_arity(&self) -> usize {
        match self {
            ResourceType::Project => 2,
            ResourceType::Database => 3,
            ResourceType::Backup => 4,
            ResourceType::BackupPolicy => 2,
            ResourceType::User => 2,
        }
    }

    pub fn all() -> &'static [ResourceType] {
        &[
            ResourceType::Project,
            ResourceType::Database,
            ResourceType::Backup,
            ResourceType::BackupPolicy,
            ResourceType::User,
        ]
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(ResourceType::Project),
            "database" => Ok(ResourceType::Database),
            "backup" => Ok(ResourceType::Backup),
            "backuppolicy" => Ok(ResourceType::BackupPolicy),
            "user" => Ok(ResourceType::User),
            other => Err(format!("unknown resource type '{}'", other)),
        }
    }
}
