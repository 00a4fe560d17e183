use std::collections::BTreeMap;
use std::sync::Arc;

use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::JaasClient;
use crate::error::AccessError;
use crate::reconcile::{diff_models, model_to_tuples, tuples_to_model};
use crate::schema::{Attribute, Schema, StringRule};
use crate::traits::{Getter, Resourcer, Setter, get};
use crate::types::{AccessId, AccessModel, Diagnostic, RelationTuple, Tag, split_id};

const PRINCIPAL_ATTRIBUTES: [&str; 3] = ["users", "groups", "service_accounts"];

/// A JAAS access resource: the principals granted one access level on a target.
///
/// The lifecycle is shared by every kind of target; the [`Resourcer`] decides
/// how the target is read from and written to state.
pub struct AccessResource<R: Resourcer> {
    client: Option<Arc<dyn JaasClient>>,
    target: R,
    log_name: &'static str,
}

impl<R: Resourcer> AccessResource<R> {
    pub fn new(target: R, log_name: &'static str) -> Self {
        AccessResource {
            client: None,
            target,
            log_name,
        }
    }

    /// Hand the resource the provider's client. `None` means the provider has
    /// not been configured yet and leaves the resource unchanged.
    pub fn configure(&mut self, client: Option<Arc<dyn JaasClient>>) {
        if let Some(client) = client {
            self.client = Some(client);
        }
    }

    /// Full resource type name, e.g. `juju_jaas_access_model`.
    pub fn type_name(&self, provider_type_name: &str) -> String {
        format!("{provider_type_name}_{}", self.target.type_suffix())
    }

    /// The shared access attributes plus the target's own attribute.
    pub fn schema(&self) -> Schema {
        let mut attributes = BTreeMap::from([
            (
                "access",
                Attribute::required_string(
                    "Level of access to grant. Changing this value will replace the Terraform resource.",
                )
                .requires_replace(),
            ),
            (
                "users",
                Attribute::optional_string_set("List of users to grant access.")
                    .with_rules([StringRule::ValidUser, StringRule::ContainsEmailDomain]),
            ),
            (
                "groups",
                Attribute::optional_string_set("List of groups to grant access.")
                    .with_rules([StringRule::ValidGroupId]),
            ),
            (
                "service_accounts",
                Attribute::optional_string_set("List of service accounts to grant access.")
                    .with_rules([StringRule::ValidServiceAccount, StringRule::NoAtSymbol]),
            ),
            ("id", Attribute::computed_id()),
        ]);
        if let Some((name, attribute)) = self.target.target_attribute() {
            attributes.insert(name, attribute);
        }
        Schema {
            description: "A resource that represents access to a JAAS object.",
            attributes,
        }
    }

    /// Config-level checks run before any plan is made.
    pub fn validate_config(&self, config: &dyn Getter) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if self.client.as_ref().is_some_and(|client| !client.is_jaas()) {
            diagnostics.push(Diagnostic::error(
                "Invalid Configuration",
                format!(
                    "The {} resource can only be used with a JAAS controller.",
                    self.log_name
                ),
            ));
        }

        let raw = config.raw();
        let any_principal = PRINCIPAL_ATTRIBUTES
            .iter()
            .any(|name| raw.get(*name).is_some_and(|v| !v.is_null()));
        if !any_principal {
            diagnostics.push(Diagnostic::error(
                "Invalid Attribute Combination",
                format!(
                    "At least one attribute out of [{}] must be specified",
                    PRINCIPAL_ATTRIBUTES.iter().join(", ")
                ),
            ));
        }

        diagnostics.extend(self.schema().validate(raw));
        diagnostics
    }

    fn client(&self, operation: &str) -> Result<&Arc<dyn JaasClient>, AccessError> {
        self.client
            .as_ref()
            .ok_or_else(|| AccessError::ClientNotConfigured {
                resource: self.log_name.to_string(),
                operation: operation.to_string(),
            })
    }

    /// Grant the planned access and record it in state.
    pub fn create(&self, plan: &dyn Getter, state: &mut dyn Setter) -> Result<(), AccessError> {
        let client = self.client("create")?;
        let (mut model, target) = self.target.info(plan)?;

        let tuples = model_to_tuples(&target, &model)?;
        client
            .add_relations(&tuples)
            .map_err(|e| AccessError::client("create access relationships", target.to_string(), e))?;

        let id = AccessId::new(target.clone(), model.access.as_str());
        info!(
            subsystem = self.log_name,
            event = "Create",
            id = %id,
            tuples = tuples.len()
        );
        model.id = Some(id.to_string());
        self.target.save(state, &model, &target)
    }

    /// Refresh state from the relations JAAS holds for the stored id.
    ///
    /// Works on freshly imported state, where only the id is known. Tuples
    /// whose object cannot be parsed are skipped and reported as warnings.
    pub fn read(
        &self,
        current: &dyn Getter,
        state: &mut dyn Setter,
    ) -> Result<Vec<Diagnostic>, AccessError> {
        let client = self.client("read")?;
        let mut model: AccessModel = get(current)?;

        let raw_id = model.id.clone().unwrap_or_default();
        let id: AccessId = raw_id.parse()?;

        let query = RelationTuple::query(id.target.to_string(), id.access.as_str());
        let tuples = client
            .read_relations(&query)
            .map_err(|e| AccessError::client("read access rules", id.target.to_string(), e))?;

        let (observed, diagnostics) = tuples_to_model(&tuples);
        debug!(
            subsystem = self.log_name,
            event = "Read",
            id = raw_id,
            tuples = tuples.len(),
            skipped = diagnostics.len()
        );

        model.users = observed.users;
        model.groups = observed.groups;
        model.service_accounts = observed.service_accounts;
        model.access = id.access.clone();
        self.target.save(state, &model, &id.target)?;
        Ok(diagnostics)
    }

    /// Add and remove principals so JAAS matches the plan.
    ///
    /// Target and access level never change here; the host replaces the
    /// resource instead. Adds are applied before removals and a failed removal
    /// leaves the adds in place.
    pub fn update(
        &self,
        plan: &dyn Getter,
        prior: &dyn Getter,
        state: &mut dyn Setter,
    ) -> Result<(), AccessError> {
        let client = self.client("update")?;
        let (prior_model, target) = self.target.info(prior)?;
        let (mut plan_model, _) = self.target.info(plan)?;

        let (to_add, to_remove) = diff_models(&plan_model, &prior_model);
        let add_tuples = model_to_tuples(&target, &to_add)?;
        let remove_tuples = model_to_tuples(&target, &to_remove)?;

        debug!(
            subsystem = self.log_name,
            event = "Update",
            target = %target,
            add = add_tuples.len(),
            remove = remove_tuples.len()
        );

        if !add_tuples.is_empty() {
            client
                .add_relations(&add_tuples)
                .map_err(|e| AccessError::client("add access rules", target.to_string(), e))?;
        }

        // TODO: persist an intermediate state holding the added tuples so a
        // failed removal below does not leave state behind JAAS.
        if !remove_tuples.is_empty() {
            client
                .delete_relations(&remove_tuples)
                .map_err(|e| AccessError::client("remove access rules", target.to_string(), e))?;
        }

        if plan_model.id.is_none() {
            plan_model.id = prior_model.id;
        }
        self.target.save(state, &plan_model, &target)
    }

    /// Revoke every principal recorded in state.
    pub fn delete(&self, state: &dyn Getter) -> Result<(), AccessError> {
        let client = self.client("delete")?;
        let (model, target) = self.target.info(state)?;

        let tuples = model_to_tuples(&target, &model)?;
        client
            .delete_relations(&tuples)
            .map_err(|e| AccessError::client("delete access rules", target.to_string(), e))?;

        info!(
            subsystem = self.log_name,
            event = "Delete",
            target = %target,
            tuples = tuples.len()
        );
        Ok(())
    }

    /// Accept an operator-supplied `<tag>:<access>` id and store it as the
    /// resource id; the next read fills in the rest.
    pub fn import_state(&self, id: &str, state: &mut dyn Setter) -> Result<(), AccessError> {
        let Some((tag, _)) = split_id(id) else {
            return Err(AccessError::Import {
                id: id.to_string(),
                reason: format!(
                    "please use format '<resourceTag>:<access>' e.g. {}",
                    self.target.import_hint()
                ),
            });
        };
        let Ok(parsed) = tag.parse::<Tag>() else {
            return Err(AccessError::Import {
                id: id.to_string(),
                reason: format!("{tag} is not a valid tag"),
            });
        };
        let expected = self.target.target_kind();
        if parsed.kind() != expected {
            return Err(AccessError::Import {
                id: id.to_string(),
                reason: format!(
                    "expected a {expected} tag, e.g. {}",
                    self.target.import_hint()
                ),
            });
        }

        let mut attributes = serde_json::Map::new();
        attributes.insert("id".to_string(), Value::String(id.to_string()));
        state.set_raw(Value::Object(attributes));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
