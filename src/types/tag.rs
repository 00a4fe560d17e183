//! Typed Juju/JAAS identifiers and their `<kind>-<id>` string form.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::error::AccessError;
use crate::validators::{
    SERVICE_ACCOUNT_DOMAIN, is_valid_cloud_name, is_valid_group_id, is_valid_user, is_valid_uuid,
};

/// Controller id JAAS uses for access to itself.
pub const JIMM_CONTROLLER_ID: &str = "jimm";

/// The kinds of tag understood by the access resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TagKind {
    User,
    Group,
    Model,
    Cloud,
    Controller,
    #[strum(serialize = "applicationoffer")]
    ApplicationOffer,
    Role,
}

impl TagKind {
    fn is_valid_id(&self, id: &str) -> bool {
        match self {
            Self::User => is_valid_user(id),
            Self::Group => is_valid_group_id(id),
            Self::Model | Self::ApplicationOffer | Self::Role => is_valid_uuid(id),
            Self::Cloud => is_valid_cloud_name(id),
            Self::Controller => id == JIMM_CONTROLLER_ID || is_valid_uuid(id),
        }
    }
}

impl Display for TagKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_ref())
    }
}

/// A typed identifier, rendered as `<kind>-<id>` (e.g. `user-alice@canonical.com`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag {
    kind: TagKind,
    id: String,
}

impl Tag {
    /// Build a tag, validating the id for its kind.
    pub fn new(kind: TagKind, id: impl Into<String>) -> Result<Self, AccessError> {
        let id = id.into();
        if !kind.is_valid_id(&id) {
            return Err(AccessError::TagParse(format!(
                "{id:?} is not a valid {kind} id"
            )));
        }
        Ok(Tag { kind, id })
    }

    pub fn user(name: impl Into<String>) -> Result<Self, AccessError> {
        Tag::new(TagKind::User, name)
    }

    pub fn group(id: impl Into<String>) -> Result<Self, AccessError> {
        Tag::new(TagKind::Group, id)
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True for a user tag whose domain marks it as a service account.
    pub fn is_service_account(&self) -> bool {
        self.kind == TagKind::User
            && self
                .id
                .rsplit_once('@')
                .is_some_and(|(_, domain)| domain == SERVICE_ACCOUNT_DOMAIN)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

impl FromStr for Tag {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once('-')
            .ok_or_else(|| AccessError::TagParse(format!("{s:?} is not a valid tag")))?;
        let kind = TagKind::from_str(kind)
            .map_err(|_| AccessError::TagParse(format!("{s:?} is not a valid tag")))?;
        Tag::new(kind, id)
    }
}

impl TryFrom<String> for Tag {
    type Error = AccessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use yare::parameterized;

    const UUID: &str = "3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f";

    #[parameterized(
        user = { "user-alice@canonical.com", TagKind::User, "alice@canonical.com" },
        local_user = { "user-admin", TagKind::User, "admin" },
        service_account = { "user-bob@serviceaccount", TagKind::User, "bob@serviceaccount" },
        group = { "group-3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f", TagKind::Group, UUID },
        model = { "model-3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f", TagKind::Model, UUID },
        cloud = { "cloud-aws", TagKind::Cloud, "aws" },
        controller = { "controller-jimm", TagKind::Controller, "jimm" },
        offer = { "applicationoffer-3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f", TagKind::ApplicationOffer, UUID },
        role = { "role-3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f", TagKind::Role, UUID },
    )]
    fn test_tag_from_str(input: &str, kind: TagKind, id: &str) {
        let tag = Tag::from_str(input).unwrap();
        assert_eq!(tag.kind(), kind);
        assert_eq!(tag.id(), id);
        assert_eq!(tag.to_string(), input);
    }

    #[parameterized(
        no_separator = { "alice" },
        unknown_kind = { "machine-0" },
        empty = { "" },
        group_not_uuid = { "group-admins" },
        model_not_uuid = { "model-default" },
        empty_user = { "user-" },
        controller_name = { "controller-prod" },
    )]
    fn test_tag_from_str_rejects(input: &str) {
        let result = Tag::from_str(input);
        assert!(matches!(result, Err(AccessError::TagParse(_))), "{input}");
    }

    #[test]
    fn test_is_service_account() {
        assert!(Tag::user("bob@serviceaccount").unwrap().is_service_account());
        assert!(!Tag::user("bob@canonical.com").unwrap().is_service_account());
        assert!(!Tag::user("bob").unwrap().is_service_account());
    }

    #[test]
    fn test_every_kind_round_trips_its_name() {
        for kind in TagKind::iter() {
            assert_eq!(TagKind::from_str(kind.as_ref()).unwrap(), kind);
        }
    }

    #[test]
    fn test_tag_serde_as_string() {
        let tag = Tag::group(UUID).unwrap();
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json, serde_json::json!(format!("group-{UUID}")));
        let back: Tag = serde_json::from_value(json).unwrap();
        assert_eq!(back, tag);
        assert!(serde_json::from_value::<Tag>(serde_json::json!("nope")).is_err());
    }
}
