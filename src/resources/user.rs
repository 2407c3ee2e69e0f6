use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{RestClient, RestError};
use crate::driver::{ManagedResource, ReadinessError};
use crate::model::identity::{join_identity, split_identity, validate_component, validate_label_keys};
use crate::model::resources::{AccessRuleModel, Labels, ResourceStatus, UserModel};
use crate::model::ResourceType;

/// Local state of a managed user.
///
/// `password` is write-only like the database's DBA password: accepted on
/// create, never returned on read, preserved in local state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserState {
    pub organization: String,
    pub name: String,
    pub password: Option<String>,
    pub access_rule: Option<AccessRuleModel>,
    pub labels: Option<Labels>,
    pub resource_version: Option<String>,
    pub status: Option<ResourceStatus>,
}

impl UserState {
    fn path(&self) -> String {
        format!("users/{}/{}", self.organization, self.name)
    }

    fn to_model(&self, include_password: bool) -> UserModel {
        UserModel {
            password: if include_password {
                self.password.clone()
            } else {
                None
            },
            access_rule: self.access_rule.clone(),
            labels: self.labels.clone(),
            resource_version: self.resource_version.clone(),
            status: None,
        }
    }

    fn apply_model(&mut self, model: UserModel) {
        // password is deliberately left untouched.
        self.access_rule = model.access_rule;
        self.labels = model.labels;
        self.resource_version = model.resource_version;
        self.status = model.status;
    }

    fn validate(&self) -> Result<(), RestError> {
        validate_component("organization", &self.organization)?;
        validate_component("user name", &self.name)?;
        if let Some(labels) = &self.labels {
            validate_label_keys(labels.keys())?;
        }
        Ok(())
    }
}

#[async_trait]
impl ManagedResource for UserState {
    const TYPE: ResourceType = ResourceType::User;

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
        let mut model = self.to_model(true);
        model.resource_version = None;
        client.put(&self.path(), &model).await
    }

    async fn read(&mut self, client: &RestClient) -> Result<(), RestError> {
        let model: UserModel = client.get(&self.path()).await?;
        self.apply_model(model);
        Ok(())
    }

    async fn put(&self, client: &RestClient) -> Result<(), RestError> {
        self.validate()?;
        client.put(&self.path(), &self.to_model(false)).await
    }

    async fn delete(&self, client: &RestClient) -> Result<(), RestError> {
        client.delete(&self.path()).await
    }

    async fn check_ready(&self, _client: &RestClient) -> Result<(), ReadinessError> {
        super::readiness_from_status(Self::TYPE, &self.id(), self.status.as_ref(), false, false)
    }
}
