use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{RestClient, RestError};
use crate::driver::resource::update_with_conflict_retry;
use crate::driver::{ManagedResource, ReadinessError};
use crate::model::identity::{join_identity, split_identity, validate_component, validate_label_keys};
use crate::model::resources::{
    DatabaseModel, DatabasePropertiesModel, Labels, MaintenanceModel, ResourceStatus,
    UpdateDbaPasswordModel,
};
use crate::model::ResourceType;

/// Local state of a managed database.
///
/// `dba_password` is write-only: the server accepts it on create and on the
/// dedicated rotation sub-operation but never returns it, so the adapter
/// preserves the last known value across reads and scrubs it from PUTs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseState {
    pub organization: String,
    pub project: String,
    pub name: String,
    pub dba_password: Option<String>,
    pub tier: Option<String>,
    pub maintenance: Option<MaintenanceModel>,
    pub properties: Option<DatabasePropertiesModel>,
    pub labels: Option<Labels>,
    pub resource_version: Option<String>,
    pub status: Option<ResourceStatus>,
}

impl DatabaseState {
    fn path(&self) -> String {
        format!(
            "databases/{}/{}/{}",
            self.organization, self.project, self.name
        )
    }

    fn dba_password_path(&self) -> String {
        format!("{}/dbaPassword", self.path())
    }

    fn to_model(&self, include_password: bool) -> DatabaseModel {
        DatabaseModel {
            dba_password: if include_password {
                self.dba_password.clone()
            } else {
                None
            },
            tier: self.tier.clone(),
            maintenance: self.maintenance.clone(),
            properties: self.properties.clone(),
            labels: self.labels.clone(),
            resource_version: self.resource_version.clone(),
            status: None,
        }
    }

    fn apply_model(&mut self, model: DatabaseModel) {
        // dba_password is deliberately left untouched.
        self.tier = model.tier;
        self.maintenance = model.maintenance;
        self.properties = model.properties;
        self.labels = model.labels;
        self.resource_version = model.resource_version;
        self.status = model.status;
    }

    fn validate(&self) -> Result<(), RestError> {
        validate_component("organization", &self.organization)?;
        validate_component("project name", &self.project)?;
        validate_component("database name", &self.name)?;
        if let Some(labels) = &self.labels {
            validate_label_keys(labels.keys())?;
        }
        Ok(())
    }

    fn maintenance_disabled(&self) -> bool {
        self.maintenance
            .as_ref()
            .and_then(|m| m.is_disabled)
            .unwrap_or(false)
    }

    /// Rotate the DBA password through the dedicated sub-operation. A 404
    /// with an empty detail means the endpoint does not exist, which is
    /// surfaced as a dedicated error so the user can revert the value
    /// instead of replacing the database.
    async fn rotate_dba_password(
        &self,
        client: &RestClient,
        current: Option<String>,
        target: String,
    ) -> Result<(), RestError> {
        debug!(id = %self.id(), "rotating DBA password");
        let body = UpdateDbaPasswordModel { current, target };
        client
            .post(&self.dba_password_path(), &body)
            .await
            .map_err(|err| {
                if err.is_dba_password_update_unsupported() {
                    RestError::DbaPasswordUpdateUnsupported
                } else {
                    err
                }
            })
    }
}

#[async_trait]
impl ManagedResource for DatabaseState {
    const TYPE: ResourceType = ResourceType::Database;

    fn set_id(&mut self, id: &str) -> Result<(), RestError> {
        let parts = split_identity(id, 3)?;
        self.reset();
        self.organization = parts[0].clone();
        self.project = parts[1].clone();
        self.name = parts[2].clone();
        Ok(())
    }

    fn id(&self) -> String {
        join_identity(&[&self.organization, &self.project, &self.name])
    }

    fn resource_version(&self) -> Option<String> {
        self.resource_version.clone()
    }

    fn set_resource_version(&mut self, version: Option<String>) {
        self.resource_version = version;
    }

    async fn create(&self, client: &RestClient) -> Result<(), RestError> {
        self.validate()?;
        let mut model = self.to_model(true);
        model.resource_version = None;
        client.put(&self.path(), &model).await
    }

    async fn read(&mut self, client: &RestClient) -> Result<(), RestError> {
        let model: DatabaseModel = client.get(&self.path()).await?;
        self.apply_model(model);
        Ok(())
    }

    async fn put(&self, client: &RestClient) -> Result<(), RestError> {
        self.validate()?;
        // The server rejects writes to dbaPassword on PUT; the password is
        // scrubbed here and retained in local state.
        client.put(&self.path(), &self.to_model(false)).await
    }

    async fn update(&mut self, client: &RestClient, prior: &Self) -> Result<(), RestError> {
        if let Some(target) = self.dba_password.clone() {
            if prior.dba_password.as_deref() != Some(target.as_str()) {
                self.rotate_dba_password(client, prior.dba_password.clone(), target)
                    .await?;
            }
        }
        update_with_conflict_retry(client, self).await
    }

    async fn delete(&self, client: &RestClient) -> Result<(), RestError> {
        client.delete(&self.path()).await
    }

    async fn check_ready(&self, _client: &RestClient) -> Result<(), ReadinessError> {
        // The ready flag doubles as the password-currency check: the server
        // only reports ready once the configured DBA credentials are applied.
        super::readiness_from_status(
            Self::TYPE,
            &self.id(),
            self.status.as_ref(),
            self.maintenance_disabled(),
            true,
        )
    }
}
