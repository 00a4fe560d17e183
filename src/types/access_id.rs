//! Composite resource id `<target-tag>:<access>`.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::AccessError;

use super::tag::Tag;

/// Identifies an access resource by its target and access level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessId {
    pub target: Tag,
    pub access: String,
}

impl AccessId {
    pub fn new(target: Tag, access: impl Into<String>) -> Self {
        AccessId {
            target,
            access: access.into(),
        }
    }
}

impl Display for AccessId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}:{}", self.target, self.access)
    }
}

/// Split a raw id into its tag and access parts without validating the tag.
pub(crate) fn split_id(id: &str) -> Option<(&str, &str)> {
    let mut parts = id.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(tag), Some(access), None) => Some((tag, access)),
        _ => None,
    }
}

impl FromStr for AccessId {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, access) = split_id(s).ok_or_else(|| AccessError::MalformedId(s.to_string()))?;
        let target = tag.parse::<Tag>().map_err(|e| AccessError::InvalidIdTag {
            tag: tag.to_string(),
            reason: e.to_string(),
        })?;
        Ok(AccessId::new(target, access))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagKind;
    use insta::assert_snapshot;
    use yare::parameterized;

    #[parameterized(
        model = { "model-3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f", "reader" },
        cloud = { "cloud-aws", "can_addmodel" },
        controller = { "controller-jimm", "administrator" },
        group = { "group-3c4f2d1e-8f5a-4b6c-9d7e-0a1b2c3d4e5f", "member" },
    )]
    fn test_encode_decode(tag: &str, access: &str) {
        let id = AccessId::new(tag.parse().unwrap(), access);
        let decoded: AccessId = id.to_string().parse().unwrap();
        assert_eq!(decoded, id);
        assert_eq!(decoded.target.to_string(), tag);
        assert_eq!(decoded.access, access);
    }

    #[parameterized(
        no_colon = { "not-a-valid-format" },
        too_many = { "cloud-aws:reader:extra" },
        empty = { "" },
    )]
    fn test_malformed(input: &str) {
        assert_eq!(
            input.parse::<AccessId>(),
            Err(AccessError::MalformedId(input.to_string()))
        );
    }

    #[test]
    fn test_bad_tag() {
        let result = "machine-0:reader".parse::<AccessId>();
        assert!(matches!(result, Err(AccessError::InvalidIdTag { ref tag, .. }) if tag == "machine-0"));
    }

    #[test]
    fn test_empty_access_is_kept() {
        let id: AccessId = "cloud-aws:".parse().unwrap();
        assert_eq!(id.target.kind(), TagKind::Cloud);
        assert_eq!(id.access, "");
    }

    #[test]
    fn test_malformed_message() {
        let err = "not-a-valid-format".parse::<AccessId>().unwrap_err();
        assert_snapshot!(err.to_string(), @r#"Access ID "not-a-valid-format" is malformed, please use the format '<resourceTag>:<access>'"#);
    }
}
