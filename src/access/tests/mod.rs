use std::sync::{Arc, Mutex};

use super::*;
use crate::client::InMemoryClient;
use crate::error::ClientError;
use crate::state::ResourceData;
use crate::targets::{CloudAccess, ControllerAccess, GroupAccess, ModelAccess};
use serde_json::json;
use yare::parameterized;


const MODEL_UUID: &str = "0b8a5d8a-1c5b-4f1e-9a0f-6f4a2b3c4d5e";
const GROUP_ID: &str = "3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f";

/// Records calls and fails the configured operation.
#[derive(Default)]
struct ScriptedClient {
    store: InMemoryClient,
    fail_add: bool,
    fail_read: bool,
    fail_delete: bool,
    calls: Mutex<Vec<&'static str>>,
}

impl ScriptedClient {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl JaasClient for ScriptedClient {
    fn is_jaas(&self) -> bool {
        true
    }

    fn add_relations(&self, tuples: &[RelationTuple]) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push("add");
        if self.fail_add {
            return Err(ClientError::new("add refused"));
        }
        self.store.add_relations(tuples)
    }

    fn read_relations(&self, query: &RelationTuple) -> Result<Vec<RelationTuple>, ClientError> {
        self.calls.lock().unwrap().push("read");
        if self.fail_read {
            return Err(ClientError::new("read refused"));
        }
        self.store.read_relations(query)
    }

    fn delete_relations(&self, tuples: &[RelationTuple]) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push("delete");
        if self.fail_delete {
            return Err(ClientError::new("delete refused"));
        }
        self.store.delete_relations(tuples)
    }
}

fn model_resource(client: Arc<dyn JaasClient>) -> AccessResource<ModelAccess> {
    let mut resource = AccessResource::new(ModelAccess, "model access");
    resource.configure(Some(client));
    resource
}

fn model_plan(users: &[&str], groups: &[&str], service_accounts: &[&str]) -> ResourceData {
    ResourceData::new(json!({
        "model_uuid": MODEL_UUID,
        "access": "writer",
        "users": users,
        "groups": groups,
        "service_accounts": service_accounts,
    }))
}

fn objects(tuples: &[RelationTuple]) -> Vec<String> {
    let mut objects: Vec<String> = tuples.iter().map(|t| t.object.clone()).collect();
    objects.sort();
    objects
}

fn strings(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_type_names() {
    assert_eq!(
        AccessResource::new(GroupAccess, "group access").type_name("juju"),
        "juju_jaas_access_group"
    );
    assert_eq!(
        AccessResource::new(ControllerAccess, "controller access").type_name("juju"),
        "juju_jaas_access_controller"
    );
}

#[test]
fn test_schema_merges_target_attribute() {
    let schema = AccessResource::new(CloudAccess, "cloud access").schema();
    let names: Vec<&str> = schema.attributes.keys().copied().collect();
    assert_eq!(
        names,
        vec!["access", "cloud_name", "groups", "id", "service_accounts", "users"]
    );
    assert!(schema.attributes["access"].requires_replace);
    assert!(schema.attributes["id"].computed);
}

#[parameterized(
    create = { "create" },
    read = { "read" },
    update = { "update" },
    delete = { "delete" },
)]
fn test_unconfigured_client(operation: &str) {
    let resource = AccessResource::new(ModelAccess, "model access");
    let plan = model_plan(&["alice@canonical.com"], &[], &[]);
    let mut state = ResourceData::empty();

    let result = match operation {
        "create" => resource.create(&plan, &mut state),
        "read" => resource.read(&plan, &mut state).map(|_| ()),
        "update" => resource.update(&plan, &plan, &mut state),
        _ => resource.delete(&plan),
    };

    assert_eq!(
        result,
        Err(AccessError::ClientNotConfigured {
            resource: "model access".to_string(),
            operation: operation.to_string(),
        })
    );
}

#[test]
fn test_configure_with_none_keeps_client() {
    let client: Arc<dyn JaasClient> = Arc::new(InMemoryClient::new());
    let mut resource = model_resource(client);
    resource.configure(None);

    let mut state = ResourceData::empty();
    resource
        .create(&model_plan(&["alice@canonical.com"], &[], &[]), &mut state)
        .unwrap();
}
