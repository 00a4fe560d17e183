//! Relation tuples exchanged with the JAAS relations API.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One access edge: `object` has `relation` to `target`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct RelationTuple {
    /// Tag of the principal, e.g. `user-alice@canonical.com`.
    pub object: String,
    /// Access level, e.g. `reader`.
    pub relation: String,
    /// Tag of the resource access is granted on.
    pub target: String,
}

impl RelationTuple {
    /// A query matching every tuple with the given target and relation.
    pub fn query(target: impl Into<String>, relation: impl Into<String>) -> Self {
        RelationTuple {
            object: String::new(),
            relation: relation.into(),
            target: target.into(),
        }
    }

    /// Returns true when every non-empty field of `query` equals this tuple's field.
    pub fn matches(&self, query: &RelationTuple) -> bool {
        (query.object.is_empty() || query.object == self.object)
            && (query.relation.is_empty() || query.relation == self.relation)
            && (query.target.is_empty() || query.target == self.target)
    }
}

impl Display for RelationTuple {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {} {}", self.object, self.relation, self.target)
    }
}
