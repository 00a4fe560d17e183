use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AccessError;
use crate::schema::Attribute;
use crate::types::{AccessModel, Tag, TagKind};

/// Reads a plan, config or state snapshot from the host framework.
pub trait Getter {
    /// The raw attribute document.
    fn raw(&self) -> &Value;
}

/// Writes resource state back to the host framework.
pub trait Setter {
    /// Replace the whole attribute document.
    fn set_raw(&mut self, value: Value);

    /// Mark the resource as gone, so the host plans a re-create.
    fn remove(&mut self);
}

/// Decode a plan or state document into a typed model.
///
/// Values of the wrong type (e.g. a number inside a string set) are reported
/// as validation errors.
pub fn get<T: DeserializeOwned>(getter: &dyn Getter) -> Result<T, AccessError> {
    Ok(serde_json::from_value(getter.raw().clone())?)
}

/// Encode a typed model and store it as the new state document.
pub fn set<T: Serialize>(setter: &mut dyn Setter, value: &T) -> Result<(), AccessError> {
    let value = serde_json::to_value(value).map_err(|e| AccessError::State(e.to_string()))?;
    setter.set_raw(value);
    Ok(())
}

/// How an access resource finds and stores the object access is granted on.
///
/// Each kind of JAAS access resource (group, model, cloud, ...) supplies one
/// implementation; the shared lifecycle lives in [`crate::AccessResource`].
pub trait Resourcer: Send + Sync {
    /// Suffix appended to the provider name, e.g. `jaas_access_model`.
    fn type_suffix(&self) -> &'static str;

    /// Kind of tag the resource grants access on.
    fn target_kind(&self) -> TagKind;

    /// Schema of the target-specific attribute, if the resource has one.
    fn target_attribute(&self) -> Option<(&'static str, Attribute)>;

    /// Read the access model and the target tag from a plan or state.
    fn info(&self, getter: &dyn Getter) -> Result<(AccessModel, Tag), AccessError>;

    /// Write the access model and target back to state.
    fn save(&self, setter: &mut dyn Setter, model: &AccessModel, tag: &Tag)
    -> Result<(), AccessError>;

    /// An example import id shown when an import id is malformed.
    fn import_hint(&self) -> &'static str;
}
