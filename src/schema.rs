//! Declarative attribute schemas and the element rules attached to them.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::types::Diagnostic;
use crate::validators::{
    avoids_at_symbol, contains_email_domain, ensure_valid_service_account_id, is_valid_cloud_name,
    is_valid_group_id, is_valid_group_name, is_valid_user, is_valid_uuid,
};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    StringSet,
}

/// A check applied to a string attribute, or to every element of a string set.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StringRule {
    ValidUser,
    ContainsEmailDomain,
    ValidGroupId,
    ValidServiceAccount,
    NoAtSymbol,
    ValidUuid,
    ValidCloudName,
    ValidGroupName,
}

impl StringRule {
    pub fn check(&self, value: &str) -> bool {
        match self {
            Self::ValidUser => is_valid_user(value),
            Self::ContainsEmailDomain => contains_email_domain(value),
            Self::ValidGroupId => is_valid_group_id(value),
            Self::ValidServiceAccount => ensure_valid_service_account_id(value).is_ok(),
            Self::NoAtSymbol => avoids_at_symbol(value),
            Self::ValidUuid => is_valid_uuid(value),
            Self::ValidCloudName => is_valid_cloud_name(value),
            Self::ValidGroupName => is_valid_group_name(value),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::ValidUser => "email must be a valid Juju username",
            Self::ContainsEmailDomain => "email must contain an @ symbol",
            Self::ValidGroupId => "group ID must be valid",
            Self::ValidServiceAccount => "service account ID must be a valid Juju username",
            Self::NoAtSymbol => "service account should not contain an @ symbol",
            Self::ValidUuid => "value must be a valid UUID",
            Self::ValidCloudName => "value must be a valid cloud name",
            Self::ValidGroupName => "group name must be valid",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Changing the value replaces the resource.
    pub requires_replace: bool,
    /// Unknown planned values keep the prior state's value.
    pub use_state_for_unknown: bool,
    pub rules: Vec<StringRule>,
}

impl Attribute {
    fn base(kind: AttributeType, description: &'static str) -> Self {
        Attribute {
            kind,
            description,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            requires_replace: false,
            use_state_for_unknown: false,
            rules: Vec::new(),
        }
    }

    pub fn required_string(description: &'static str) -> Self {
        Attribute {
            required: true,
            ..Self::base(AttributeType::String, description)
        }
    }

    pub fn optional_string(description: &'static str) -> Self {
        Attribute {
            optional: true,
            ..Self::base(AttributeType::String, description)
        }
    }

    pub fn optional_string_set(description: &'static str) -> Self {
        Attribute {
            optional: true,
            ..Self::base(AttributeType::StringSet, description)
        }
    }

    /// A provider-computed value that survives plans unchanged.
    pub fn computed_string(description: &'static str) -> Self {
        Attribute {
            computed: true,
            use_state_for_unknown: true,
            ..Self::base(AttributeType::String, description)
        }
    }

    pub fn computed_id() -> Self {
        Self::computed_string("")
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = StringRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Check `value` against the attribute's rules.
    ///
    /// Null values pass; type mismatches and rule violations are reported as
    /// error diagnostics naming the attribute.
    pub fn validate(&self, name: &str, value: &Value) -> Vec<Diagnostic> {
        let strings: Vec<&Value> = match (self.kind, value) {
            (_, Value::Null) => return Vec::new(),
            (AttributeType::String, v) => vec![v],
            (AttributeType::StringSet, Value::Array(items)) => items.iter().collect(),
            (AttributeType::StringSet, _) => {
                return vec![invalid(name, "expected a set of strings")];
            }
        };

        let mut diagnostics = Vec::new();
        for item in strings {
            let Some(s) = item.as_str() else {
                diagnostics.push(invalid(name, &format!("expected a string, got {item}")));
                continue;
            };
            for rule in &self.rules {
                if !rule.check(s) {
                    diagnostics.push(invalid(
                        name,
                        &format!("value {s:?}: {}", rule.message()),
                    ));
                }
            }
        }
        diagnostics
    }
}

fn invalid(name: &str, detail: &str) -> Diagnostic {
    Diagnostic::error(
        "Invalid Attribute Value",
        format!("Attribute {name} {detail}"),
    )
}

/// A resource schema: a description and its named attributes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    /// Validate every declared attribute present in `config`.
    pub fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        self.attributes
            .iter()
            .flat_map(|(name, attribute)| {
                attribute.validate(name, config.get(*name).unwrap_or(&Value::Null))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yare::parameterized;

    fn users() -> Attribute {
        Attribute::optional_string_set("List of users to grant access.")
            .with_rules([StringRule::ValidUser, StringRule::ContainsEmailDomain])
    }

    #[parameterized(
        valid = { json!(["alice@canonical.com"]), 0 },
        null = { Value::Null, 0 },
        missing_domain = { json!(["alice"]), 1 },
        invalid_and_no_domain = { json!(["-alice"]), 2 },
        not_a_string = { json!([7]), 1 },
        not_a_set = { json!("alice@canonical.com"), 1 },
    )]
    fn test_string_set_rules(value: Value, errors: usize) {
        let diagnostics = users().validate("users", &value);
        assert_eq!(diagnostics.len(), errors, "{diagnostics:?}");
        assert!(diagnostics.iter().all(Diagnostic::is_error));
    }

    #[test]
    fn test_rule_message_in_detail() {
        let diagnostics = users().validate("users", &json!(["alice"]));
        insta::assert_snapshot!(diagnostics[0].detail, @r#"Attribute users value "alice": email must contain an @ symbol"#);
    }

    #[test]
    fn test_builders() {
        let attribute = Attribute::required_string("Level of access to grant.").requires_replace();
        assert!(attribute.required);
        assert!(attribute.requires_replace);
        assert!(!attribute.optional);

        let id = Attribute::computed_id();
        assert!(id.computed && id.use_state_for_unknown);

        let secret = Attribute::optional_string("kubeconfig").sensitive();
        assert!(secret.sensitive);
    }

    #[test]
    fn test_schema_validate_visits_each_attribute() {
        let schema = Schema {
            description: "test",
            attributes: BTreeMap::from([
                ("users", users()),
                (
                    "model_uuid",
                    Attribute::required_string("uuid").with_rules([StringRule::ValidUuid]),
                ),
            ]),
        };
        let diagnostics = schema.validate(&json!({"users": ["bob"], "model_uuid": "nope"}));
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_serialize_attribute() {
        let json = serde_json::to_value(Attribute::computed_id()).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["computed"], true);
    }
}
