//! The kinds of object JAAS access can be granted on.

use serde_json::Value;

use crate::error::AccessError;
use crate::schema::{Attribute, StringRule};
use crate::traits::{Getter, Resourcer, Setter, get, set};
use crate::types::{AccessModel, JIMM_CONTROLLER_ID, Tag, TagKind};

/// Read the access model plus the target id stored under `field`.
fn read_target(
    getter: &dyn Getter,
    field: &str,
    kind: TagKind,
) -> Result<(AccessModel, Tag), AccessError> {
    let model: AccessModel = get(getter)?;
    let id = getter
        .raw()
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| AccessError::Validation(format!("attribute {field} must be set")))?;
    let tag = Tag::new(kind, id)?;
    Ok((model, tag))
}

/// Store the access model with the target id under `field`.
fn write_target(
    setter: &mut dyn Setter,
    field: &str,
    model: &AccessModel,
    tag: &Tag,
) -> Result<(), AccessError> {
    let mut value =
        serde_json::to_value(model).map_err(|e| AccessError::State(e.to_string()))?;
    if let Value::Object(attributes) = &mut value {
        attributes.insert(field.to_string(), Value::String(tag.id().to_string()));
    }
    setter.set_raw(value);
    Ok(())
}

/// Access to a JAAS group, e.g. group membership.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupAccess;

impl Resourcer for GroupAccess {
    fn type_suffix(&self) -> &'static str {
        "jaas_access_group"
    }

    fn target_kind(&self) -> TagKind {
        TagKind::Group
    }

    fn target_attribute(&self) -> Option<(&'static str, Attribute)> {
        Some((
            "group_id",
            Attribute::required_string(
                "The ID of the group for access management. If this is changed the resource will be deleted and a new resource will be created.",
            )
            .requires_replace()
            .with_rules([StringRule::ValidGroupId]),
        ))
    }

    fn info(&self, getter: &dyn Getter) -> Result<(AccessModel, Tag), AccessError> {
        read_target(getter, "group_id", self.target_kind())
    }

    fn save(
        &self,
        setter: &mut dyn Setter,
        model: &AccessModel,
        tag: &Tag,
    ) -> Result<(), AccessError> {
        write_target(setter, "group_id", model, tag)
    }

    fn import_hint(&self) -> &'static str {
        "group-<uuid>:member"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModelAccess;

impl Resourcer for ModelAccess {
    fn type_suffix(&self) -> &'static str {
        "jaas_access_model"
    }

    fn target_kind(&self) -> TagKind {
        TagKind::Model
    }

    fn target_attribute(&self) -> Option<(&'static str, Attribute)> {
        Some((
            "model_uuid",
            Attribute::required_string(
                "The uuid of the model for access management. If this is changed the resource will be deleted and a new resource will be created.",
            )
            .requires_replace()
            .with_rules([StringRule::ValidUuid]),
        ))
    }

    fn info(&self, getter: &dyn Getter) -> Result<(AccessModel, Tag), AccessError> {
        read_target(getter, "model_uuid", self.target_kind())
    }

    fn save(
        &self,
        setter: &mut dyn Setter,
        model: &AccessModel,
        tag: &Tag,
    ) -> Result<(), AccessError> {
        write_target(setter, "model_uuid", model, tag)
    }

    fn import_hint(&self) -> &'static str {
        "model-<uuid>:writer"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CloudAccess;

impl Resourcer for CloudAccess {
    fn type_suffix(&self) -> &'static str {
        "jaas_access_cloud"
    }

    fn target_kind(&self) -> TagKind {
        TagKind::Cloud
    }

    fn target_attribute(&self) -> Option<(&'static str, Attribute)> {
        Some((
            "cloud_name",
            Attribute::required_string(
                "The name of the cloud for access management. If this is changed the resource will be deleted and a new resource will be created.",
            )
            .requires_replace()
            .with_rules([StringRule::ValidCloudName]),
        ))
    }

    fn info(&self, getter: &dyn Getter) -> Result<(AccessModel, Tag), AccessError> {
        read_target(getter, "cloud_name", self.target_kind())
    }

    fn save(
        &self,
        setter: &mut dyn Setter,
        model: &AccessModel,
        tag: &Tag,
    ) -> Result<(), AccessError> {
        write_target(setter, "cloud_name", model, tag)
    }

    fn import_hint(&self) -> &'static str {
        "cloud-<name>:can_addmodel"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OfferAccess;

impl Resourcer for OfferAccess {
    fn type_suffix(&self) -> &'static str {
        "jaas_access_offer"
    }

    fn target_kind(&self) -> TagKind {
        TagKind::ApplicationOffer
    }

    fn target_attribute(&self) -> Option<(&'static str, Attribute)> {
        Some((
            "offer_uuid",
            Attribute::required_string(
                "The uuid of the application offer for access management. If this is changed the resource will be deleted and a new resource will be created.",
            )
            .requires_replace()
            .with_rules([StringRule::ValidUuid]),
        ))
    }

    fn info(&self, getter: &dyn Getter) -> Result<(AccessModel, Tag), AccessError> {
        read_target(getter, "offer_uuid", self.target_kind())
    }

    fn save(
        &self,
        setter: &mut dyn Setter,
        model: &AccessModel,
        tag: &Tag,
    ) -> Result<(), AccessError> {
        write_target(setter, "offer_uuid", model, tag)
    }

    fn import_hint(&self) -> &'static str {
        "applicationoffer-<uuid>:consumer"
    }
}

/// Access to JAAS itself. The target is always the `jimm` controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerAccess;

impl Resourcer for ControllerAccess {
    fn type_suffix(&self) -> &'static str {
        "jaas_access_controller"
    }

    fn target_kind(&self) -> TagKind {
        TagKind::Controller
    }

    fn target_attribute(&self) -> Option<(&'static str, Attribute)> {
        None
    }

    fn info(&self, getter: &dyn Getter) -> Result<(AccessModel, Tag), AccessError> {
        let model: AccessModel = get(getter)?;
        Ok((model, Tag::new(self.target_kind(), JIMM_CONTROLLER_ID)?))
    }

    fn save(
        &self,
        setter: &mut dyn Setter,
        model: &AccessModel,
        _tag: &Tag,
    ) -> Result<(), AccessError> {
        set(setter, model)
    }

    fn import_hint(&self) -> &'static str {
        "controller-jimm:administrator"
    }
}
