//! The desired or observed access grant on one target.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Principals granted one access level on a target.
///
/// Service accounts are users in the `serviceaccount` domain, kept in their
/// own set and stored without the domain. A `null` set in plan or state reads
/// as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessModel {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub service_accounts: BTreeSet<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub groups: BTreeSet<String>,
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub id: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AccessModel {
    pub fn new(access: impl Into<String>) -> Self {
        AccessModel {
            access: access.into(),
            ..Default::default()
        }
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn with_service_accounts<I, S>(mut self, accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_accounts
            .extend(accounts.into_iter().map(Into::into));
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// True when no principal of any kind is present.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.service_accounts.is_empty() && self.groups.is_empty()
    }

    /// Number of principals across all sets.
    pub fn len(&self) -> usize {
        self.users.len() + self.service_accounts.len() + self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_missing_sets_read_as_empty() {
        let model: AccessModel = serde_json::from_value(json!({
            "users": null,
            "groups": ["3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f"],
            "access": "reader",
        }))
        .unwrap();
        assert!(model.users.is_empty());
        assert!(model.service_accounts.is_empty());
        assert_eq!(model.groups.len(), 1);
        assert_eq!(model.id, None);
    }

    #[test]
    fn test_non_string_elements_are_rejected() {
        let result: Result<AccessModel, _> = serde_json::from_value(json!({
            "users": [1, 2],
            "access": "reader",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicates_collapse() {
        let model = AccessModel::new("writer").with_users(["alice@canonical.com", "alice@canonical.com"]);
        assert_eq!(model.len(), 1);
        assert!(!model.is_empty());
    }

    #[test]
    fn test_serialization_is_sorted() {
        let model = AccessModel::new("reader")
            .with_users(["zoe@canonical.com", "alice@canonical.com"])
            .with_service_accounts(["bob"]);
        insta::assert_json_snapshot!(model, @r#"
        {
          "users": [
            "alice@canonical.com",
            "zoe@canonical.com"
          ],
          "service_accounts": [
            "bob"
          ],
          "groups": [],
          "access": "reader",
          "id": null
        }
        "#);
    }
}
