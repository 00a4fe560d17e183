//! JAAS groups: the group resource and the lookup-by-uuid data source.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{JaasGroup, JaasGroupClient};
use crate::error::AccessError;
use crate::schema::{Attribute, Schema, StringRule};
use crate::traits::{Getter, Setter, get, set};
use crate::types::Diagnostic;
use crate::validators::is_valid_uuid;

/// Attributes of a group as held in plan and state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupModel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uuid: Option<String>,
}

impl From<JaasGroup> for GroupModel {
    fn from(group: JaasGroup) -> Self {
        GroupModel {
            name: group.name,
            uuid: Some(group.uuid),
        }
    }
}

impl GroupModel {
    fn uuid(&self) -> Result<&str, AccessError> {
        self.uuid
            .as_deref()
            .ok_or_else(|| AccessError::Validation("attribute uuid must be set".to_string()))
    }
}

fn client_or_unconfigured<'a>(
    client: &'a Option<Arc<dyn JaasGroupClient>>,
    resource: &str,
    operation: &str,
) -> Result<&'a Arc<dyn JaasGroupClient>, AccessError> {
    client
        .as_ref()
        .ok_or_else(|| AccessError::ClientNotConfigured {
            resource: resource.to_string(),
            operation: operation.to_string(),
        })
}

/// A JAAS group, created by name. Renaming keeps the uuid.
#[derive(Default)]
pub struct GroupResource {
    client: Option<Arc<dyn JaasGroupClient>>,
}

impl GroupResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, client: Option<Arc<dyn JaasGroupClient>>) {
        if let Some(client) = client {
            self.client = Some(client);
        }
    }

    pub fn type_name(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_jaas_group")
    }

    pub fn schema(&self) -> Schema {
        Schema {
            description: "A resource that represents a group in JAAS.",
            attributes: BTreeMap::from([
                (
                    "name",
                    Attribute::required_string("The name of the group.")
                        .with_rules([StringRule::ValidGroupName]),
                ),
                (
                    "uuid",
                    Attribute::computed_string("The UUID of the group."),
                ),
            ]),
        }
    }

    pub fn validate_config(&self, config: &dyn Getter) -> Vec<Diagnostic> {
        self.schema().validate(config.raw())
    }

    pub fn create(&self, plan: &dyn Getter, state: &mut dyn Setter) -> Result<(), AccessError> {
        let client = client_or_unconfigured(&self.client, "group", "create")?;
        let model: GroupModel = get(plan)?;

        let group = client
            .add_group(&model.name)
            .map_err(|e| AccessError::client("create group", model.name.as_str(), e))?;

        info!(event = "Create", subsystem = "group", name = group.name, uuid = group.uuid);
        set(state, &GroupModel::from(group))
    }

    /// Refresh the name from JAAS, dropping state when the group is gone.
    pub fn read(&self, current: &dyn Getter, state: &mut dyn Setter) -> Result<(), AccessError> {
        let client = client_or_unconfigured(&self.client, "group", "read")?;
        let model: GroupModel = get(current)?;
        let uuid = model.uuid()?;

        let group = client
            .read_group(uuid)
            .map_err(|e| AccessError::client("read group", uuid, e))?;
        match group {
            Some(group) => set(state, &GroupModel::from(group)),
            None => {
                info!(event = "Read", subsystem = "group", uuid, found = false);
                state.remove();
                Ok(())
            }
        }
    }

    /// Only the name changes in place.
    pub fn update(
        &self,
        plan: &dyn Getter,
        prior: &dyn Getter,
        state: &mut dyn Setter,
    ) -> Result<(), AccessError> {
        let client = client_or_unconfigured(&self.client, "group", "update")?;
        let prior_model: GroupModel = get(prior)?;
        let plan_model: GroupModel = get(plan)?;

        if plan_model.name != prior_model.name {
            client
                .rename_group(&prior_model.name, &plan_model.name)
                .map_err(|e| AccessError::client("rename group", prior_model.name.as_str(), e))?;
        }

        set(
            state,
            &GroupModel {
                name: plan_model.name,
                uuid: prior_model.uuid,
            },
        )
    }

    pub fn delete(&self, state: &dyn Getter) -> Result<(), AccessError> {
        let client = client_or_unconfigured(&self.client, "group", "delete")?;
        let model: GroupModel = get(state)?;

        client
            .remove_group(&model.name)
            .map_err(|e| AccessError::client("remove group", model.name.as_str(), e))?;
        info!(event = "Delete", subsystem = "group", name = model.name);
        Ok(())
    }

    /// The import id is the group uuid; the next read fills in the name.
    pub fn import_state(&self, id: &str, state: &mut dyn Setter) -> Result<(), AccessError> {
        if !is_valid_uuid(id) {
            return Err(AccessError::Import {
                id: id.to_string(),
                reason: "please use the group uuid".to_string(),
            });
        }
        set(
            state,
            &GroupModel {
                uuid: Some(id.to_string()),
                ..Default::default()
            },
        )
    }
}

/// Looks up an existing group by uuid.
#[derive(Default)]
pub struct GroupDataSource {
    client: Option<Arc<dyn JaasGroupClient>>,
}

impl GroupDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(&mut self, client: Option<Arc<dyn JaasGroupClient>>) {
        if let Some(client) = client {
            self.client = Some(client);
        }
    }

    pub fn type_name(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_jaas_group")
    }

    pub fn schema(&self) -> Schema {
        Schema {
            description: "A data source representing a JAAS group.",
            attributes: BTreeMap::from([
                (
                    "uuid",
                    Attribute::required_string("The UUID of the group.")
                        .with_rules([StringRule::ValidUuid]),
                ),
                (
                    "name",
                    Attribute::computed_string("The name of the group."),
                ),
            ]),
        }
    }

    pub fn read(&self, config: &dyn Getter, state: &mut dyn Setter) -> Result<(), AccessError> {
        let client = client_or_unconfigured(&self.client, "group data source", "read")?;
        let model: GroupModel = get(config)?;
        let uuid = model.uuid()?;

        let group = client
            .read_group(uuid)
            .map_err(|e| AccessError::client("read group", uuid, e))?
            .ok_or_else(|| AccessError::NotFound {
                resource: "group".to_string(),
                id: uuid.to_string(),
            })?;
        set(state, &GroupModel::from(group))
    }
}
