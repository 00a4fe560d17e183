//! Remote APIs consumed by the resources, and an in-memory implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientError;
use crate::types::RelationTuple;

/// The JAAS relations API.
pub trait JaasClient: Send + Sync {
    /// True when the controller behind this client is JAAS.
    fn is_jaas(&self) -> bool;

    fn add_relations(&self, tuples: &[RelationTuple]) -> Result<(), ClientError>;

    /// Return every tuple matching the non-empty fields of `query`.
    fn read_relations(&self, query: &RelationTuple) -> Result<Vec<RelationTuple>, ClientError>;

    fn delete_relations(&self, tuples: &[RelationTuple]) -> Result<(), ClientError>;
}

/// A JAAS group. The uuid is assigned by JAAS and never changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JaasGroup {
    pub uuid: String,
    pub name: String,
}

/// The JAAS group management API.
pub trait JaasGroupClient: Send + Sync {
    /// Create a group and return it with its new uuid.
    fn add_group(&self, name: &str) -> Result<JaasGroup, ClientError>;

    /// `Ok(None)` when no group has that uuid.
    fn read_group(&self, uuid: &str) -> Result<Option<JaasGroup>, ClientError>;

    fn rename_group(&self, name: &str, new_name: &str) -> Result<(), ClientError>;

    fn remove_group(&self, name: &str) -> Result<(), ClientError>;
}

/// A kubernetes cloud as registered on the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KubernetesCloud {
    pub name: String,
    pub kubeconfig: Option<String>,
    pub parent_cloud_name: Option<String>,
    pub parent_cloud_region: Option<String>,
}

/// The controller's cloud API, limited to kubernetes clouds.
pub trait KubernetesCloudClient: Send + Sync {
    fn add_kubernetes_cloud(&self, cloud: &KubernetesCloud) -> Result<(), ClientError>;

    /// `Ok(None)` when no cloud of that name exists.
    fn read_kubernetes_cloud(&self, name: &str) -> Result<Option<KubernetesCloud>, ClientError>;

    fn update_kubernetes_cloud(&self, cloud: &KubernetesCloud) -> Result<(), ClientError>;

    fn remove_kubernetes_cloud(&self, name: &str) -> Result<(), ClientError>;
}

/// Thread-safe in-memory relation and cloud store.
#[derive(Debug, Default)]
pub struct InMemoryClient {
    relations: RwLock<Vec<RelationTuple>>,
    clouds: RwLock<BTreeMap<String, KubernetesCloud>>,
    groups: RwLock<BTreeMap<String, JaasGroup>>,
    next_group: AtomicU64,
    not_jaas: bool,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client that reports a plain Juju controller rather than JAAS.
    pub fn juju_only() -> Self {
        InMemoryClient {
            not_jaas: true,
            ..Self::default()
        }
    }

    /// Snapshot of every stored tuple.
    pub fn relations(&self) -> Result<Vec<RelationTuple>, ClientError> {
        Ok(self.relations.read().map_err(poisoned)?.clone())
    }
}

fn poisoned<T>(err: std::sync::PoisonError<T>) -> ClientError {
    ClientError::new(format!("in-memory store lock poisoned: {err}"))
}

impl JaasClient for InMemoryClient {
    fn is_jaas(&self) -> bool {
        !self.not_jaas
    }

    fn add_relations(&self, tuples: &[RelationTuple]) -> Result<(), ClientError> {
        let mut relations = self.relations.write().map_err(poisoned)?;
        for tuple in tuples {
            if !relations.contains(tuple) {
                relations.push(tuple.clone());
            }
        }
        debug!(event = "Relations", phase = "Add", count = tuples.len());
        Ok(())
    }

    fn read_relations(&self, query: &RelationTuple) -> Result<Vec<RelationTuple>, ClientError> {
        let relations = self.relations.read().map_err(poisoned)?;
        Ok(relations
            .iter()
            .filter(|tuple| tuple.matches(query))
            .cloned()
            .collect())
    }

    fn delete_relations(&self, tuples: &[RelationTuple]) -> Result<(), ClientError> {
        let mut relations = self.relations.write().map_err(poisoned)?;
        relations.retain(|existing| !tuples.contains(existing));
        debug!(event = "Relations", phase = "Delete", count = tuples.len());
        Ok(())
    }
}

impl JaasGroupClient for InMemoryClient {
    fn add_group(&self, name: &str) -> Result<JaasGroup, ClientError> {
        let mut groups = self.groups.write().map_err(poisoned)?;
        if groups.values().any(|group| group.name == name) {
            return Err(ClientError::new(format!("group {name:?} already exists")));
        }
        let serial = self.next_group.fetch_add(1, Ordering::Relaxed) + 1;
        let group = JaasGroup {
            uuid: format!("00000000-0000-4000-8000-{serial:012x}"),
            name: name.to_string(),
        };
        groups.insert(group.uuid.clone(), group.clone());
        debug!(event = "Groups", phase = "Add", uuid = group.uuid);
        Ok(group)
    }

    fn read_group(&self, uuid: &str) -> Result<Option<JaasGroup>, ClientError> {
        Ok(self.groups.read().map_err(poisoned)?.get(uuid).cloned())
    }

    fn rename_group(&self, name: &str, new_name: &str) -> Result<(), ClientError> {
        let mut groups = self.groups.write().map_err(poisoned)?;
        if groups.values().any(|group| group.name == new_name) {
            return Err(ClientError::new(format!("group {new_name:?} already exists")));
        }
        let group = groups
            .values_mut()
            .find(|group| group.name == name)
            .ok_or_else(|| ClientError::new(format!("group {name:?} not found")))?;
        group.name = new_name.to_string();
        Ok(())
    }

    fn remove_group(&self, name: &str) -> Result<(), ClientError> {
        let mut groups = self.groups.write().map_err(poisoned)?;
        let before = groups.len();
        groups.retain(|_, group| group.name != name);
        if groups.len() == before {
            return Err(ClientError::new(format!("group {name:?} not found")));
        }
        Ok(())
    }
}

impl KubernetesCloudClient for InMemoryClient {
    fn add_kubernetes_cloud(&self, cloud: &KubernetesCloud) -> Result<(), ClientError> {
        let mut clouds = self.clouds.write().map_err(poisoned)?;
        if clouds.contains_key(&cloud.name) {
            return Err(ClientError::new(format!(
                "cloud {:?} already exists",
                cloud.name
            )));
        }
        clouds.insert(cloud.name.clone(), cloud.clone());
        Ok(())
    }

    fn read_kubernetes_cloud(&self, name: &str) -> Result<Option<KubernetesCloud>, ClientError> {
        Ok(self.clouds.read().map_err(poisoned)?.get(name).cloned())
    }

    fn update_kubernetes_cloud(&self, cloud: &KubernetesCloud) -> Result<(), ClientError> {
        let mut clouds = self.clouds.write().map_err(poisoned)?;
        match clouds.get_mut(&cloud.name) {
            Some(existing) => {
                *existing = cloud.clone();
                Ok(())
            }
            None => Err(ClientError::new(format!("cloud {:?} not found", cloud.name))),
        }
    }

    fn remove_kubernetes_cloud(&self, name: &str) -> Result<(), ClientError> {
        self.clouds
            .write()
            .map_err(poisoned)?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ClientError::new(format!("cloud {name:?} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(object: &str, relation: &str) -> RelationTuple {
        RelationTuple {
            object: object.to_string(),
            relation: relation.to_string(),
            target: "cloud-aws".to_string(),
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let client = InMemoryClient::new();
        let tuples = vec![tuple("user-alice@canonical.com", "reader")];
        client.add_relations(&tuples).unwrap();
        client.add_relations(&tuples).unwrap();
        assert_eq!(client.relations().unwrap().len(), 1);
    }

    #[test]
    fn test_read_filters_by_relation() {
        let client = InMemoryClient::new();
        client
            .add_relations(&[
                tuple("user-alice@canonical.com", "reader"),
                tuple("user-bob@canonical.com", "writer"),
            ])
            .unwrap();

        let read = client
            .read_relations(&RelationTuple::query("cloud-aws", "writer"))
            .unwrap();
        assert_eq!(read, vec![tuple("user-bob@canonical.com", "writer")]);
    }

    #[test]
    fn test_delete_only_named_tuples() {
        let client = InMemoryClient::new();
        client
            .add_relations(&[
                tuple("user-alice@canonical.com", "reader"),
                tuple("user-bob@canonical.com", "reader"),
            ])
            .unwrap();
        client
            .delete_relations(&[tuple("user-alice@canonical.com", "reader")])
            .unwrap();
        assert_eq!(
            client.relations().unwrap(),
            vec![tuple("user-bob@canonical.com", "reader")]
        );
    }

    #[test]
    fn test_is_jaas() {
        assert!(InMemoryClient::new().is_jaas());
        assert!(!InMemoryClient::juju_only().is_jaas());
    }

    #[test]
    fn test_group_lifecycle() {
        let client = InMemoryClient::new();
        let group = client.add_group("admins").unwrap();
        assert!(crate::validators::is_valid_uuid(&group.uuid));
        assert!(client.add_group("admins").is_err());

        let other = client.add_group("ops").unwrap();
        assert_ne!(other.uuid, group.uuid);
        assert!(client.rename_group("admins", "ops").is_err());

        client.rename_group("admins", "platform").unwrap();
        let renamed = client.read_group(&group.uuid).unwrap().unwrap();
        assert_eq!(renamed.name, "platform");

        client.remove_group("platform").unwrap();
        assert_eq!(client.read_group(&group.uuid).unwrap(), None);
        assert!(client.remove_group("platform").is_err());
    }

    #[test]
    fn test_cloud_lifecycle() {
        let client = InMemoryClient::new();
        let mut cloud = KubernetesCloud {
            name: "k8s".to_string(),
            kubeconfig: Some("apiVersion: v1".to_string()),
            ..Default::default()
        };

        client.add_kubernetes_cloud(&cloud).unwrap();
        assert!(client.add_kubernetes_cloud(&cloud).is_err());

        cloud.kubeconfig = Some("apiVersion: v2".to_string());
        client.update_kubernetes_cloud(&cloud).unwrap();
        assert_eq!(client.read_kubernetes_cloud("k8s").unwrap(), Some(cloud));

        client.remove_kubernetes_cloud("k8s").unwrap();
        assert_eq!(client.read_kubernetes_cloud("k8s").unwrap(), None);
        assert!(client.remove_kubernetes_cloud("k8s").is_err());
    }
}
