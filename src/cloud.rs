//! Kubernetes clouds registered on the controller.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{KubernetesCloud, KubernetesCloudClient};
use crate::error::AccessError;
use crate::schema::{Attribute, Schema, StringRule};
use crate::traits::{Getter, Setter, get, set};

/// Attributes of the kubernetes cloud resource as held in plan and state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KubernetesCloudModel {
    pub name: String,
    #[serde(default)]
    pub kubeconfig: Option<String>,
    #[serde(default)]
    pub parentcloudname: Option<String>,
    #[serde(default)]
    pub parentcloudregion: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl KubernetesCloudModel {
    fn to_cloud(&self) -> KubernetesCloud {
        KubernetesCloud {
            name: self.name.clone(),
            kubeconfig: self.kubeconfig.clone(),
            parent_cloud_name: self.parentcloudname.clone(),
            parent_cloud_region: self.parentcloudregion.clone(),
        }
    }
}

#[derive(Default)]
pub struct KubernetesCloudResource {
    client: Option<Arc<dyn KubernetesCloudClient>>,
}

impl KubernetesCloudResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, client: Option<Arc<dyn KubernetesCloudClient>>) {
        if let Some(client) = client {
            self.client = Some(client);
        }
    }

    pub fn type_name(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_kubernetes_cloud")
    }

    pub fn schema(&self) -> Schema {
        Schema {
            description: "A resource that represent a Juju Cloud for existing controller.",
            attributes: BTreeMap::from([
                (
                    "name",
                    Attribute::required_string(
                        "The name of the cloud. Changing this value will cause the cloud to be destroyed and recreated by terraform.",
                    )
                    .requires_replace()
                    .with_rules([StringRule::ValidCloudName]),
                ),
                (
                    "kubeconfig",
                    Attribute::optional_string("The kubeconfig file path for the cloud.")
                        .sensitive(),
                ),
                (
                    "parentcloudname",
                    Attribute::optional_string(
                        "The parent cloud name in case adding k8s cluster from existed cloud. Changing this value will cause the cloud to be destroyed and recreated by terraform.",
                    )
                    .requires_replace(),
                ),
                (
                    "parentcloudregion",
                    Attribute::optional_string(
                        "The parent cloud region name in case adding k8s cluster from existed cloud. Changing this value will cause the cloud to be destroyed and recreated by terraform.",
                    )
                    .requires_replace(),
                ),
                ("id", Attribute::computed_id()),
            ]),
        }
    }

    fn client(&self, operation: &str) -> Result<&Arc<dyn KubernetesCloudClient>, AccessError> {
        self.client
            .as_ref()
            .ok_or_else(|| AccessError::ClientNotConfigured {
                resource: "kubernetes cloud".to_string(),
                operation: operation.to_string(),
            })
    }

    /// Register the cloud and use its name as the resource id.
    pub fn create(&self, plan: &dyn Getter, state: &mut dyn Setter) -> Result<(), AccessError> {
        let client = self.client("create")?;
        let mut model: KubernetesCloudModel = get(plan)?;

        client
            .add_kubernetes_cloud(&model.to_cloud())
            .map_err(|e| AccessError::client("create kubernetes cloud", model.name.as_str(), e))?;

        info!(event = "Create", subsystem = "kubernetes cloud", name = model.name);
        model.id = Some(model.name.clone());
        set(state, &model)
    }

    /// Refresh state from the controller, dropping it if the cloud is gone.
    pub fn read(&self, current: &dyn Getter, state: &mut dyn Setter) -> Result<(), AccessError> {
        let client = self.client("read")?;
        let mut model: KubernetesCloudModel = get(current)?;
        if model.name.is_empty() {
            model.name = model.id.clone().unwrap_or_default();
        }

        let cloud = client
            .read_kubernetes_cloud(&model.name)
            .map_err(|e| AccessError::client("read kubernetes cloud", model.name.as_str(), e))?;
        let Some(cloud) = cloud else {
            info!(event = "Read", subsystem = "kubernetes cloud", name = model.name, found = false);
            state.remove();
            return Ok(());
        };

        model.parentcloudname = cloud.parent_cloud_name;
        model.parentcloudregion = cloud.parent_cloud_region;
        if cloud.kubeconfig.is_some() {
            model.kubeconfig = cloud.kubeconfig;
        }
        model.id = Some(cloud.name);
        set(state, &model)
    }

    /// Only the kubeconfig can change in place.
    pub fn update(&self, plan: &dyn Getter, state: &mut dyn Setter) -> Result<(), AccessError> {
        let client = self.client("update")?;
        let mut model: KubernetesCloudModel = get(plan)?;

        client
            .update_kubernetes_cloud(&model.to_cloud())
            .map_err(|e| AccessError::client("update kubernetes cloud", model.name.as_str(), e))?;

        model.id = Some(model.name.clone());
        set(state, &model)
    }

    pub fn delete(&self, state: &dyn Getter) -> Result<(), AccessError> {
        let client = self.client("delete")?;
        let model: KubernetesCloudModel = get(state)?;

        client
            .remove_kubernetes_cloud(&model.name)
            .map_err(|e| AccessError::client("remove kubernetes cloud", model.name.as_str(), e))?;
        info!(event = "Delete", subsystem = "kubernetes cloud", name = model.name);
        Ok(())
    }

    /// The import id is the cloud name.
    pub fn import_state(&self, id: &str, state: &mut dyn Setter) -> Result<(), AccessError> {
        set(
            state,
            &KubernetesCloudModel {
                name: id.to_string(),
                id: Some(id.to_string()),
                ..Default::default()
            },
        )
    }
}
