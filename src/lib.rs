// src/lib.rs
//! Declarative JAAS access-control resources.
//!
//! An access resource grants one access level on a JAAS object (a group,
//! model, cloud, offer or the controller itself) to sets of users, groups and
//! service accounts. Each grant is stored by JAAS as relation tuples; the
//! resources translate plan/state lifecycles into the minimal tuple changes.
//! Groups themselves and kubernetes clouds are managed by their own resources.
pub use access::AccessResource;
pub use client::{
    InMemoryClient, JaasClient, JaasGroup, JaasGroupClient, KubernetesCloud, KubernetesCloudClient,
};
pub use cloud::{KubernetesCloudModel, KubernetesCloudResource};
pub use error::{AccessError, ClientError};
pub use group::{GroupDataSource, GroupModel, GroupResource};
pub use reconcile::{diff_models, diff_set, model_to_tuples, tuples_to_model};
pub use schema::{Attribute, AttributeType, Schema, StringRule};
pub use state::ResourceData;
pub use targets::{CloudAccess, ControllerAccess, GroupAccess, ModelAccess, OfferAccess};
pub use traits::{Getter, Resourcer, Setter};
pub use types::{
    AccessId, AccessModel, Diagnostic, JIMM_CONTROLLER_ID, RelationTuple, Severity, Tag, TagKind,
    has_error,
};
pub use validators::{SERVICE_ACCOUNT_DOMAIN, ensure_valid_service_account_id};

mod access;
mod client;
mod cloud;
mod error;
mod group;
mod reconcile;
mod schema;
mod state;
mod targets;
mod traits;
mod types;
mod validators;
