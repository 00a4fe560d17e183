//! Data model types for access resources.
//!
//! Canonical string forms:
//! - Tag: `<kind>-<id>`, e.g. `user-alice@canonical.com`, `group-<uuid>`
//! - Access id: `<tag>:<access>`, e.g. `model-<uuid>:writer`
//! - Service account: `user-<client-id>@serviceaccount`, shown without the domain

mod access_id;
mod access_model;
mod diagnostic;
mod tag;
mod tuple;

pub use access_id::AccessId;
pub(crate) use access_id::split_id;
pub use access_model::AccessModel;
pub use diagnostic::{Diagnostic, Severity, has_error};
pub use tag::{JIMM_CONTROLLER_ID, Tag, TagKind};
pub use tuple::RelationTuple;
