//! Identifier validation shared by tag parsing and config validation.
//!
//! All patterns are compiled once and never mutated.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AccessError;

/// Domain that marks a user identity as a service account.
pub const SERVICE_ACCOUNT_DOMAIN: &str = "serviceaccount";

static USER_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9.+-]*[a-zA-Z0-9])?(?:@[a-zA-Z0-9](?:[a-zA-Z0-9.-]*[a-zA-Z0-9])?)?$")
        .expect("user name pattern compiles")
});

// Local part follows the user name grammar so a qualified id is always a
// valid user tag id.
static SERVICE_ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9.+-]*[a-zA-Z0-9])?@serviceaccount$")
        .expect("service account pattern compiles")
});

static GROUP_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9._-]*[a-zA-Z0-9])?$").expect("group name pattern compiles")
});

static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

static CLOUD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9.-]*$").expect("cloud name pattern compiles"));

static BASIC_EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".+@.+").expect("email pattern compiles"));

static AVOID_AT_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@]*$").expect("at-symbol pattern compiles"));

/// Returns true for a Juju user name, optionally qualified with a domain.
pub fn is_valid_user(name: &str) -> bool {
    USER_NAME_RE.is_match(name)
}

/// Returns true when the id is a fully qualified service account id.
pub fn is_valid_service_account_id(id: &str) -> bool {
    SERVICE_ACCOUNT_RE.is_match(id)
}

/// Appends the service account domain when missing and validates the result.
///
/// `"bob"` becomes `"bob@serviceaccount"`; an id that already carries the
/// domain is returned unchanged.
pub fn ensure_valid_service_account_id(id: &str) -> Result<String, AccessError> {
    let qualified = if id.contains('@') {
        id.to_string()
    } else {
        format!("{id}@{SERVICE_ACCOUNT_DOMAIN}")
    };
    if is_valid_service_account_id(&qualified) {
        Ok(qualified)
    } else {
        Err(AccessError::Validation(format!(
            "invalid service account ID {id:?}"
        )))
    }
}

/// Strips the service account domain from a qualified id.
pub fn strip_service_account_domain(id: &str) -> &str {
    match id.find('@') {
        Some(idx) => &id[..idx],
        None => id,
    }
}

pub fn is_valid_uuid(id: &str) -> bool {
    UUID_RE.is_match(id)
}

/// Group ids are UUIDs assigned by JAAS.
pub fn is_valid_group_id(id: &str) -> bool {
    is_valid_uuid(id)
}

/// Group names are chosen by operators; JAAS assigns the uuid.
pub fn is_valid_group_name(name: &str) -> bool {
    GROUP_NAME_RE.is_match(name)
}

pub fn is_valid_cloud_name(name: &str) -> bool {
    CLOUD_NAME_RE.is_match(name)
}

pub fn contains_email_domain(value: &str) -> bool {
    BASIC_EMAIL_RE.is_match(value)
}

pub fn avoids_at_symbol(value: &str) -> bool {
    AVOID_AT_SYMBOL_RE.is_match(value)
}
