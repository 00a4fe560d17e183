//! Host-facing diagnostics.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AccessError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A summary/detail pair reported back to the host framework.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {}: {}", self.summary, self.detail)
    }
}

impl From<&AccessError> for Diagnostic {
    fn from(err: &AccessError) -> Self {
        let summary = match err {
            AccessError::Validation(_) => "Validation Error",
            AccessError::TagParse(_) => "failed to parse relation tag",
            AccessError::MalformedId(_) => "Malformed ID",
            AccessError::InvalidIdTag { .. } => "ID Error",
            AccessError::Import { .. } => "ImportState Failure",
            AccessError::ClientNotConfigured { .. } => "Provider Not Configured",
            AccessError::Client { .. } => "Client Error",
            AccessError::NotFound { .. } => "Not Found",
            AccessError::State(_) => "State Error",
        };
        Diagnostic::error(summary, err.to_string())
    }
}

impl From<AccessError> for Diagnostic {
    fn from(err: AccessError) -> Self {
        Diagnostic::from(&err)
    }
}

/// Returns true if any diagnostic is an error.
pub fn has_error(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
