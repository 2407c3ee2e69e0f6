//! Stateless helpers that flatten hierarchical listings into fully-qualified
//! slash-joined names and compose server-side label filters.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::client::{RestClient, RestError};
use crate::model::identity::{is_valid_name, NAME_PATTERN};
use crate::model::resources::ItemList;
use crate::model::ResourceType;

// ─── Label Filters ──────────────────────────────────────────────────────────

/// One term of a label-filter expression. Terms are conjunctive: the server
/// returns resources matching every term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelFilter {
    /// `key` — the key is present, with any value.
    Present(String),
    /// `!key` — the key is absent.
    Absent(String),
    /// `key=value` — the key is present with exactly this value.
    Equals(String, String),
    /// `key!=value` — the key is absent or has a different value.
    NotEquals(String, String),
}

impl LabelFilter {
    fn validate_key(key: &str) -> Result<(), RestError> {
        if !is_valid_name(key) {
            return Err(RestError::InvalidArgument(format!(
                "label key '{}' does not match {}",
                key, NAME_PATTERN
            )));
        }
        Ok(())
    }

    /// Evaluate this term against a label map. Mirrors the server-side
    /// semantics; used to verify the conjunction locally.
    pub fn matches(&self, labels: &HashMap<String, String>) -> bool {
        match self {
            LabelFilter::Present(key) => labels.contains_key(key),
            LabelFilter::Absent(key) => !labels.contains_key(key),
            LabelFilter::Equals(key, value) => labels.get(key) == Some(value),
            LabelFilter::NotEquals(key, value) => labels.get(key) != Some(value),
        }
    }
}

impl FromStr for LabelFilter {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((key, value)) = s.split_once("!=") {
            Self::validate_key(key)?;
            return Ok(LabelFilter::NotEquals(key.to_string(), value.to_string()));
        }
        if let Some((key, value)) = s.split_once('=') {
            Self::validate_key(key)?;
            return Ok(LabelFilter::Equals(key.to_string(), value.to_string()));
        }
        if let Some(key) = s.strip_prefix('!') {
            Self::validate_key(key)?;
            return Ok(LabelFilter::Absent(key.to_string()));
        }
        Self::validate_key(s)?;
        Ok(LabelFilter::Present(s.to_string()))
    }
}

impl fmt::Display for LabelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFilter::Present(key) => write!(f, "{}", key),
            LabelFilter::Absent(key) => write!(f, "!{}", key),
            LabelFilter::Equals(key, value) => write!(f, "{}={}", key, value),
            LabelFilter::NotEquals(key, value) => write!(f, "{}!={}", key, value),
        }
    }
}

/// Parse a list of raw filter terms.
pub fn parse_filters(raw: &[String]) -> Result<Vec<LabelFilter>, RestError> {
    raw.iter().map(|term| term.parse()).collect()
}

/// Evaluate a conjunction of filter terms against a label map.
pub fn matches_all(filters: &[LabelFilter], labels: &HashMap<String, String>) -> bool {
    filters.iter().all(|filter| filter.matches(labels))
}

// ─── Scope Routing ──────────────────────────────────────────────────────────

/// The hierarchical scope a listing is restricted to.
#[derive(Debug, Clone, Default)]
pub struct ListScope {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub database: Option<String>,
}

impl ListScope {
    pub fn organization(organization: &str) -> Self {
        Self {
            organization: Some(organization.to_string()),
            ..Self::default()
        }
    }

    pub fn project(organization: &str, project: &str) -> Self {
        Self {
            organization: Some(organization.to_string()),
            project: Some(project.to_string()),
            database: None,
        }
    }

    pub fn database(organization: &str, project: &str, database: &str) -> Self {
        Self {
            organization: Some(organization.to_string()),
            project: Some(project.to_string()),
            database: Some(database.to_string()),
        }
    }

    /// Resolve the endpoint path and the prefix to prepend to returned
    /// names. First match wins; a deeper filter without its parent fails.
    fn route(&self, resource_type: ResourceType) -> Result<(String, String), RestError> {
        let Some(organization) = self.organization.clone() else {
            if self.project.is_some() {
                return Err(RestError::InvalidArgument(
                    "cannot specify project filter without organization".to_string(),
                ));
            }
            if self.database.is_some() {
                return Err(RestError::InvalidArgument(
                    "cannot specify database filter without organization".to_string(),
                ));
            }
            return Ok((resource_type.path_segment().to_string(), String::new()));
        };
        if self.project.is_none() && self.database.is_some() {
            return Err(RestError::InvalidArgument(
                "cannot specify database filter without project".to_string(),
            ));
        }

        // The deepest scope a type supports is one level above its own name.
        let max_depth = resource_type.identity_arity() - 1;
        let mut components = vec![organization];
        components.extend(self.project.clone());
        components.extend(self.database.clone());
        if components.len() > max_depth {
            let excess = match components.len() {
                2 => "project",
                _ => "database",
            };
            return Err(RestError::InvalidArgument(format!(
                "cannot filter {} listings by {}",
                resource_type, excess
            )));
        }

        let path = format!("{}/{}", resource_type.path_segment(), components.join("/"));
        let prefix = format!("{}/", components.join("/"));
        Ok((path, prefix))
    }
}

// ─── Listing ────────────────────────────────────────────────────────────────

/// List resources of one type within a scope, returning fully-qualified
/// names. Label filters are always forwarded; scopes that do not support
/// them are rejected by the server, never silently dropped here.
pub async fn list_resources(
    client: &RestClient,
    resource_type: ResourceType,
    scope: &ListScope,
    filters: &[LabelFilter],
    list_accessible: bool,
) -> Result<Vec<String>, RestError> {
    let (path, prefix) = scope.route(resource_type)?;

    let mut query: Vec<(&str, String)> = Vec::new();
    if !filters.is_empty() {
        let joined = filters
            .iter()
            .map(LabelFilter::to_string)
            .collect::<Vec<_>>()
            .join(",");
        query.push(("labelFilter", joined));
    }
    query.push(("listAccessible", list_accessible.to_string()));

    debug!(%path, ?filters, "listing resources");
    let body: ItemList = client.get_with_query(&path, &query).await?;
    Ok(body
        .items
        .into_iter()
        .map(|name| format!("{}{}", prefix, name))
        .collect())
}

/// Convenience wrappers, one per resource type.
pub async fn list_projects(
    client: &RestClient,
    scope: &ListScope,
    filters: &[LabelFilter],
    list_accessible: bool,
) -> Result<Vec<String>, RestError> {
    list_resources(client, ResourceType::Project, scope, filters, list_accessible).await
}

pub async fn list_databases(
    client: &RestClient,
    scope: &ListScope,
    filters: &[LabelFilter],
    list_accessible: bool,
) -> Result<Vec<String>, RestError> {
    list_resources(client, ResourceType::Database, scope, filters, list_accessible).await
}

pub async fn list_backups(
    client: &RestClient,
    scope: &ListScope,
    filters: &[LabelFilter],
    list_accessible: bool,
) -> Result<Vec<String>, RestError> {
    list_resources(client, ResourceType::Backup, scope, filters, list_accessible).await
}

pub async fn list_backup_policies(
    client: &RestClient,
    scope: &ListScope,
    filters: &[LabelFilter],
    list_accessible: bool,
) -> Result<Vec<String>, RestError> {
    list_resources(
        client,
        ResourceType::BackupPolicy,
        scope,
        filters,
        list_accessible,
    )
    .await
}

pub async fn list_users(
    client: &RestClient,
    scope: &ListScope,
    filters: &[LabelFilter],
    list_accessible: bool,
) -> Result<Vec<String>, RestError> {
    list_resources(client, ResourceType::User, scope, filters, list_accessible).await
}
