//! In-memory plan/state documents exchanged with the host framework.

use serde_json::Value;

use crate::traits::{Getter, Setter};

/// A JSON attribute document, as the host hands plans and state to a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    value: Value,
}

impl ResourceData {
    pub fn new(value: Value) -> Self {
        ResourceData { value }
    }

    /// An empty document, as seen before a resource is created.
    pub fn empty() -> Self {
        ResourceData { value: Value::Null }
    }

    /// True once the resource has been removed from state.
    pub fn is_removed(&self) -> bool {
        self.value.is_null()
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.value.get(name)
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl From<Value> for ResourceData {
    fn from(value: Value) -> Self {
        ResourceData::new(value)
    }
}

impl Getter for ResourceData {
    fn raw(&self) -> &Value {
        &self.value
    }
}

impl Setter for ResourceData {
    fn set_raw(&mut self, value: Value) {
        self.value = value;
    }

    fn remove(&mut self) {
        self.value = Value::Null;
    }
}
