//! Conversion between access models and relation tuples, and the set diff
//! used to update a grant in place.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::AccessError;
use crate::types::{AccessModel, Diagnostic, RelationTuple, Tag, TagKind};
use crate::validators::{ensure_valid_service_account_id, strip_service_account_domain};

/// Build one tuple per principal in `model`, all targeting `target`.
///
/// Tuples are emitted for users, then groups, then service accounts, each in
/// sorted order. Service accounts may omit the `@serviceaccount` domain.
pub fn model_to_tuples(
    target: &Tag,
    model: &AccessModel,
) -> Result<Vec<RelationTuple>, AccessError> {
    let base = RelationTuple {
        object: String::new(),
        relation: model.access.clone(),
        target: target.to_string(),
    };

    let mut tuples = Vec::with_capacity(model.len());
    tuples.extend(assign_tuple_object(&base, &model.users, |name| Tag::user(name))?);
    tuples.extend(assign_tuple_object(&base, &model.groups, |id| Tag::group(id))?);
    // Service accounts are users in the serviceaccount domain.
    tuples.extend(assign_tuple_object(&base, &model.service_accounts, |id| {
        Tag::user(ensure_valid_service_account_id(id)?)
    })?);

    debug!(
        event = "Tuples",
        phase = "FromModel",
        target = %target,
        relation = model.access,
        count = tuples.len()
    );
    Ok(tuples)
}

fn assign_tuple_object<F>(
    base: &RelationTuple,
    items: &BTreeSet<String>,
    to_tag: F,
) -> Result<Vec<RelationTuple>, AccessError>
where
    F: Fn(&str) -> Result<Tag, AccessError>,
{
    items
        .iter()
        .map(|item| {
            let tag = to_tag(item.as_str())
                .map_err(|e| AccessError::Validation(format!("{item:?}: {e}")))?;
            Ok(RelationTuple {
                object: tag.to_string(),
                ..base.clone()
            })
        })
        .collect()
}

/// Rebuild the principal sets from tuples read back from JAAS.
///
/// Objects that are not valid tags are skipped with a warning diagnostic.
/// Tags of kinds other than user and group are ignored. The access level is
/// left empty for the caller to fill in.
pub fn tuples_to_model(tuples: &[RelationTuple]) -> (AccessModel, Vec<Diagnostic>) {
    let mut model = AccessModel::default();
    let mut diagnostics = Vec::new();

    for tuple in tuples {
        let tag = match tuple.object.parse::<Tag>() {
            Ok(tag) => tag,
            Err(e) => {
                warn!(
                    event = "Tuples",
                    phase = "ToModel",
                    object = tuple.object,
                    error = %e
                );
                diagnostics.push(Diagnostic::warning(
                    "failed to parse relation tag",
                    format!("error parsing {}: {e}", tuple.object),
                ));
                continue;
            }
        };

        match tag.kind() {
            TagKind::User if tag.is_service_account() => {
                model
                    .service_accounts
                    .insert(strip_service_account_domain(tag.id()).to_string());
            }
            TagKind::User => {
                model.users.insert(tag.id().to_string());
            }
            TagKind::Group => {
                model.groups.insert(tag.id().to_string());
            }
            _ => {}
        }
    }

    (model, diagnostics)
}

/// Elements of `current` that are not in `target`, in `current`'s order.
pub fn diff_set(current: &BTreeSet<String>, target: &BTreeSet<String>) -> BTreeSet<String> {
    current
        .iter()
        .filter(|item| !target.contains(*item))
        .cloned()
        .collect()
}

/// Compute the principals to add and remove to move from `state` to `plan`.
///
/// Both results carry the plan's access level: a change of access level
/// replaces the resource rather than updating it.
pub fn diff_models(plan: &AccessModel, state: &AccessModel) -> (AccessModel, AccessModel) {
    let to_add = AccessModel {
        users: diff_set(&plan.users, &state.users),
        service_accounts: diff_set(&plan.service_accounts, &state.service_accounts),
        groups: diff_set(&plan.groups, &state.groups),
        access: plan.access.clone(),
        id: None,
    };
    let to_remove = AccessModel {
        users: diff_set(&state.users, &plan.users),
        service_accounts: diff_set(&state.service_accounts, &plan.service_accounts),
        groups: diff_set(&state.groups, &plan.groups),
        access: plan.access.clone(),
        id: None,
    };
    (to_add, to_remove)
}
