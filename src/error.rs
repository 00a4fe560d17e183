use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a remote client (JAAS or kubernetes clouds).
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("{0}")]
pub struct ClientError(pub String);

impl ClientError {
    pub fn new(message: impl Into<String>) -> Self {
        ClientError(message.into())
    }
}

#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccessError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("failed to parse tag: {0}")]
    TagParse(String),

    #[error("Access ID {0:?} is malformed, please use the format '<resourceTag>:<access>'")]
    MalformedId(String),

    #[error("Tag {tag} from ID is not valid: {reason}")]
    InvalidIdTag { tag: String, reason: String },

    #[error("Malformed Import ID {id:?}, {reason}")]
    Import { id: String, reason: String },

    #[error("Unable to {operation} {resource}, the provider client is not configured")]
    ClientNotConfigured { resource: String, operation: String },

    #[error("Unable to {action} for {target}, got error: {source}")]
    Client {
        action: String,
        target: String,
        source: ClientError,
    },

    #[error("{resource} {id:?} not found")]
    NotFound { resource: String, id: String },

    #[error("state error: {0}")]
    State(String),
}

impl AccessError {
    pub(crate) fn client(action: &str, target: impl Into<String>, source: ClientError) -> Self {
        AccessError::Client {
            action: action.to_string(),
            target: target.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for AccessError {
    fn from(err: serde_json::Error) -> Self {
        AccessError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_client_error_message() {
        let err = AccessError::client(
            "create access relationships",
            "model-0b8a5d8a-1c5b-4f1e-9a0f-6f4a2b3c4d5e",
            ClientError::new("connection refused"),
        );
        assert_snapshot!(err.to_string(), @"Unable to create access relationships for model-0b8a5d8a-1c5b-4f1e-9a0f-6f4a2b3c4d5e, got error: connection refused");
    }

    #[test]
    fn test_client_error_source_chain() {
        use std::error::Error;

        let err = AccessError::client("read access rules", "cloud-aws", ClientError::new("boom"));
        let source = err.source().expect("client errors carry a source");
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_serde_error_is_validation() {
        let err: AccessError = serde_json::from_str::<Vec<String>>("[1]")
            .unwrap_err()
            .into();
        assert!(matches!(err, AccessError::Validation(_)));
    }
}
