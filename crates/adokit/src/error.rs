//! Error types for variable group operations.
//!
//! The taxonomy separates local validation failures, policy violations of the
//! reconciliation table (conflict / not found), and remote transport failures.
//! Remote failures carry the method and URL so they can be diagnosed without
//! a retry.

use crate::sender::SendError;

/// Result type alias for adokit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling variable groups.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A definition failed local validation before any remote call.
    #[error("invalid definition: {0}")]
    Validation(String),

    /// Create was requested but the group already exists remotely.
    #[error("variable group '{name}' already exists with id {id}; use update or upsert")]
    Conflict {
        /// Group name that collided.
        name: String,
        /// Remote id of the existing group.
        id: u64,
    },

    /// Update was requested but no group with this name exists remotely.
    #[error("variable group '{name}' not found; use create or upsert")]
    NotFound {
        /// Group name that was looked up.
        name: String,
    },

    /// The project is missing from the organization project list.
    #[error("project '{0}' not found in organization")]
    ProjectNotFound(String),

    /// A read request against the remote service failed.
    #[error("{method} {url} failed: {message}")]
    RemoteQuery {
        /// HTTP method of the failed request.
        method: &'static str,
        /// Full request URL.
        url: String,
        /// Transport or HTTP error message.
        message: String,
        /// HTTP status code if one was received.
        status: Option<u16>,
    },

    /// A create, update, or delete request against the remote service failed.
    #[error("{method} {url} failed for '{name}': {message}")]
    RemoteWrite {
        /// Name of the group the write targeted.
        name: String,
        /// HTTP method of the failed request.
        method: &'static str,
        /// Full request URL.
        url: String,
        /// Transport or HTTP error message.
        message: String,
        /// HTTP status code if one was received.
        status: Option<u16>,
    },
}

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a transport failure from a read request.
    pub fn remote_query(method: &'static str, url: impl Into<String>, err: SendError) -> Self {
        Self::RemoteQuery {
            method,
            url: url.into(),
            message: err.message,
            status: err.status,
        }
    }

    /// Wrap a transport failure from a write request.
    pub fn remote_write(
        name: impl Into<String>,
        method: &'static str,
        url: impl Into<String>,
        err: SendError,
    ) -> Self {
        Self::RemoteWrite {
            name: name.into(),
            method,
            url: url.into(),
            message: err.message,
            status: err.status,
        }
    }

    /// Whether this error originated in the transport rather than in policy.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteQuery { .. } | Self::RemoteWrite { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_display() {
        let err = Error::Conflict {
            name: "release-vars".to_string(),
            id: 12,
        };
        let display = format!("{err}");
        assert!(display.contains("release-vars"));
        assert!(display.contains("12"));
        assert!(display.contains("upsert"));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound {
            name: "missing".to_string(),
        };
        assert!(format!("{err}").contains("not found"));
    }

    #[test]
    fn test_remote_query_carries_context() {
        let err = Error::remote_query(
            "GET",
            "https://dev.azure.com/contoso/_apis/projects",
            SendError {
                message: "HTTP 503".to_string(),
                status: Some(503),
            },
        );
        let display = format!("{err}");
        assert!(display.contains("GET"));
        assert!(display.contains("_apis/projects"));
        assert!(display.contains("503"));
        assert!(err.is_remote());
    }

    #[test]
    fn test_remote_write_carries_target_name() {
        let err = Error::remote_write(
            "release-vars",
            "PUT",
            "https://dev.azure.com/contoso/_apis/distributedtask/variablegroups/4",
            SendError {
                message: "connection reset".to_string(),
                status: None,
            },
        );
        let display = format!("{err}");
        assert!(display.contains("release-vars"));
        assert!(display.contains("PUT"));
        assert!(err.is_remote());
    }

    #[test]
    fn test_policy_errors_are_not_remote() {
        assert!(!Error::validation("no name").is_remote());
        assert!(
            !Error::NotFound {
                name: "x".to_string()
            }
            .is_remote()
        );
        assert!(!Error::ProjectNotFound("Fabrikam".to_string()).is_remote());
    }
}
