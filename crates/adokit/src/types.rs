//! Core types for variable group reconciliation.

use serde::{Deserialize, Serialize};

/// Remote project scope that every variable group belongs to.
///
/// Resolved once per run from the organization project list and treated as
/// immutable afterwards. The id is the service-assigned GUID, not the display
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Service-assigned project id (GUID).
    pub id: String,
    /// Project display name.
    pub name: String,
}

impl ProjectRef {
    /// Create a project reference.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Minimal projection of a remote variable group.
///
/// Produced only by listing or lookup against the remote service; never
/// constructed from local state. The id is the authoritative remote identity
/// and is always positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableGroupRef {
    /// Remote variable group id.
    pub id: u64,
    /// Group name, the sole key used for matching desired state.
    pub name: String,
}

/// Canonical wire shape of a single variable.
///
/// The secret and read-only flags are kept optional rather than defaulted:
/// the service distinguishes an unset flag from an explicitly false one in
/// update semantics, so flags the source never specified must stay off the
/// wire entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableValue {
    /// Variable value.
    pub value: String,
    /// Whether the value is masked as a secret.
    #[serde(rename = "isSecret", default, skip_serializing_if = "Option::is_none")]
    pub is_secret: Option<bool>,
    /// Whether the variable is read-only in the pipeline UI.
    #[serde(
        rename = "isReadOnly",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_read_only: Option<bool>,
}

impl VariableValue {
    /// A plain value with no flags set.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_secret: None,
            is_read_only: None,
        }
    }
}
