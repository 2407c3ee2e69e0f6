use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{RestClient, RestError};
use crate::driver::{ManagedResource, ReadinessError};
use crate::model::identity::{join_identity, split_identity, validate_component, validate_label_keys};
use crate::model::resources::{
    BackupPolicyModel, BackupRetentionModel, BackupSelectorModel, Labels, ResourceStatus,
};
use crate::model::ResourceType;

/// Local state of a managed backup policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupPolicyState {
    pub organization: String,
    pub name: String,
    pub frequency: Option<String>,
    pub selector: Option<BackupSelectorModel>,
    pub retention: Option<BackupRetentionModel>,
    pub suspended: Option<bool>,
    pub labels: Option<Labels>,
    pub resource_version: Option<String>,
    pub status: Option<ResourceStatus>,
}

impl BackupPolicyState {
    fn path(&self) -> String {
        format!("backuppolicies/{}/{}", self.organization, self.name)
    }

    fn to_model(&self) -> BackupPolicyModel {
        BackupPolicyModel {
            frequency: self.frequency.clone(),
            selector: self.selector.clone(),
            retention: self.retention.clone(),
            suspended: self.suspended,
            labels: self.labels.clone(),
            resource_version: self.resource_version.clone(),
            status: None,
        }
    }

    fn apply_model(&mut self, model: BackupPolicyModel) {
        self.frequency = model.frequency;
        self.selector = model.selector;
        self.retention = model.retention;
        self.suspended = model.suspended;
        self.labels = model.labels;
        self.resource_version = model.resource_version;
        self.status = model.status;
    }

    fn validate(&self) -> Result<(), RestError> {
        validate_component("organization", &self.organization)?;
        validate_component("policy name", &self.name)?;
        if let Some(labels) = &self.labels {
            validate_label_keys(labels.keys())?;
        }
        Ok(())
    }
}

#[async_trait]
impl ManagedResource for BackupPolicyState {
    const TYPE: ResourceType = ResourceType::BackupPolicy;

    fn set_id(&mut self, id: &str) -> Result<(), RestError> {
        let parts = split_identity(id, 2)?;
        self.reset();
        self.organization = parts[0].clone();
        self.name = parts[1].clone();
        Ok(())
    }

    fn id(&self) -> String {
        join_identity(&[&self.organization, &self.name])
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
        let model: BackupPolicyModel = client.get(&self.path()).await?;
        self.apply_model(model);
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
        super::readiness_from_status(Self::TYPE, &self.id(), self.status.as_ref(), false, false)
    }
}
