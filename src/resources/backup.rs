use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{RestClient, RestError};
use crate::driver::{ManagedResource, ReadinessError};
use crate::model::identity::{join_identity, split_identity, validate_component, validate_label_keys};
use crate::model::resources::{BackupModel, Labels, ResourceStatus, State};
use crate::model::ResourceType;

/// Local state of a managed backup. Readiness means the backup succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupState {
    pub organization: String,
    pub project: String,
    pub database: String,
    pub name: String,
    pub labels: Option<Labels>,
    pub resource_version: Option<String>,
    pub status: Option<ResourceStatus>,
}

impl BackupState {
    fn path(&self) -> String {
        format!(
            "backups/{}/{}/{}/{}",
            self.organization, self.project, self.database, self.name
        )
    }

    fn to_model(&self) -> BackupModel {
        BackupModel {
            labels: self.labels.clone(),
            resource_version: self.resource_version.clone(),
            status: None,
        }
    }

    fn validate(&self) -> Result<(), RestError> {
        validate_component("organization", &self.organization)?;
        validate_component("project name", &self.project)?;
        validate_component("database name", &self.database)?;
        validate_component("backup name", &self.name)?;
        if let Some(labels) = &self.labels {
            validate_label_keys(labels.keys())?;
        }
        Ok(())
    }
}

#[async_trait]
impl ManagedResource for BackupState {
    const TYPE: ResourceType = ResourceType::Backup;

    fn set_id(&mut self, id: &str) -> Result<(), RestError> {
        let parts = split_identity(id, 4)?;
        self.reset();
        self.organization = parts[0].clone();
        self.project = parts[1].clone();
        self.database = parts[2].clone();
        self.name = parts[3].clone();
        Ok(())
    }

    fn id(&self) -> String {
        join_identity(&[
            &self.organization,
            &self.project,
            &self.database,
            &self.name,
        ])
    }

    fn resource_version(&self) -> Option<String> {
        self.resource_version.clone()
    }

    fn set_resource_version(&mut self, version: Option<String>) {
        self.resource_version = version;
    }

    async fn create(&self, client: &RestClient) -> Result<(), RestError> {
        self.validate()?;
        let mut model = self.to_model();
        model.resource_version = None;
        client.put(&self.path(), &model).await
    }

    async fn read(&mut self, client: &RestClient) -> Result<(), RestError> {
        let model: BackupModel = client.get(&self.path()).await?;
        self.labels = model.labels;
        self.resource_version = model.resource_version;
        self.status = model.status;
        Ok(())
    }

    async fn put(&self, client: &RestClient) -> Result<(), RestError> {
        self.validate()?;
        client.put(&self.path(), &self.to_model()).await
    }

    async fn delete(&self, client: &RestClient) -> Result<(), RestError> {
        client.delete(&self.path()).await
    }

    async fn check_ready(&self, _client: &RestClient) -> Result<(), ReadinessError> {
        let state = self.status.as_ref().and_then(|s| s.state);
        match state {
            Some(State::Succeeded) => Ok(()),
            Some(State::Failed) => Err(ReadinessError::Failed(format!(
                "backup {}: {}",
                self.id(),
                self.status
                    .as_ref()
                    .and_then(|s| s.message.as_deref())
                    .unwrap_or("no details available")
            ))),
            other => Err(ReadinessError::NotReady(format!(
                "backup {} has not succeeded: state is {}",
                self.id(),
                other.map(|s| s.to_string()).unwrap_or_else(|| "unset".to_string())
            ))),
        }
    }
}
