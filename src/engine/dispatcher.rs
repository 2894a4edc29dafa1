//! Reconciliation dispatch - one decision per definition.
//!
//! Each definition is looked up by exact name and the requested operation is
//! applied against what was found. Definitions are processed independently:
//! a failure becomes a structured outcome for that definition and the batch
//! moves on. The lookup is redone per definition, never cached, so a create
//! earlier in the batch is visible to later definitions.

use std::fmt;

use adokit::{Client, Error, ProjectRef};

use crate::schema::VariableGroupDefinition;

/// Requested reconciliation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create; fails if the group already exists.
    Create,
    /// Update in place; fails if the group does not exist.
    Update,
    /// Create if absent, else update.
    Upsert,
}

impl Operation {
    /// Lowercase operation name for display.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Upsert => "upsert",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How one definition's reconciliation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Group was created.
    Created,
    /// Group was updated in place.
    Updated,
    /// Create refused: the group already exists.
    Conflict,
    /// Update refused: no such group.
    NotFound,
    /// Validation or remote failure.
    Error,
}

/// Structured outcome for one definition.
#[derive(Debug)]
pub struct ApplyOutcome {
    pub name: String,
    pub operation: Operation,
    pub status: OutcomeStatus,
    pub remote_id: Option<u64>,
    pub message: Option<String>,
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Created | OutcomeStatus::Updated)
    }

    /// Outcome for a definition that failed before or during dispatch.
    pub fn failure(
        name: impl Into<String>,
        operation: Operation,
        status: OutcomeStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operation,
            status,
            remote_id: None,
            message: Some(message.into()),
        }
    }
}

/// Tally of a reconciliation batch.
#[derive(Debug, Default)]
pub struct ApplySummary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl ApplySummary {
    pub fn add(&mut self, outcome: &ApplyOutcome) {
        match outcome.status {
            OutcomeStatus::Created => self.created += 1,
            OutcomeStatus::Updated => self.updated += 1,
            OutcomeStatus::Conflict | OutcomeStatus::NotFound | OutcomeStatus::Error => {
                self.failed += 1;
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn total(&self) -> usize {
        self.created + self.updated + self.failed
    }
}

/// Reconcile a single definition against the remote project.
pub fn reconcile_one(
    client: &Client,
    project: &ProjectRef,
    definition: &VariableGroupDefinition,
    operation: Operation,
) -> ApplyOutcome {
    let display_name = if definition.name.trim().is_empty() {
        "(unnamed)".to_string()
    } else {
        definition.name.clone()
    };

    let payload = match definition.to_payload() {
        Ok(payload) => payload,
        Err(err) => {
            return ApplyOutcome::failure(
                display_name,
                operation,
                OutcomeStatus::Error,
                err.to_string(),
            );
        }
    };

    let existing = match client.find_by_name(project, &payload.name) {
        Ok(existing) => existing,
        Err(err) => {
            return ApplyOutcome::failure(
                payload.name,
                operation,
                OutcomeStatus::Error,
                err.to_string(),
            );
        }
    };

    log::debug!(
        "dispatch {} for '{}': remote {}",
        operation,
        payload.name,
        existing
            .as_ref()
            .map_or_else(|| "absent".to_string(), |g| format!("id {}", g.id))
    );

    match (operation, existing) {
        (Operation::Create | Operation::Upsert, None) => {
            match client.create(project, &payload) {
                Ok(created) => ApplyOutcome {
                    name: created.name,
                    operation,
                    status: OutcomeStatus::Created,
                    remote_id: Some(created.id),
                    message: None,
                },
                Err(err) => ApplyOutcome::failure(
                    payload.name,
                    operation,
                    OutcomeStatus::Error,
                    err.to_string(),
                ),
            }
        }
        (Operation::Create, Some(found)) => {
            let err = Error::Conflict {
                name: found.name.clone(),
                id: found.id,
            };
            ApplyOutcome {
                name: found.name,
                operation,
                status: OutcomeStatus::Conflict,
                remote_id: Some(found.id),
                message: Some(err.to_string()),
            }
        }
        (Operation::Update, None) => {
            let err = Error::NotFound {
                name: payload.name.clone(),
            };
            ApplyOutcome::failure(payload.name, operation, OutcomeStatus::NotFound, err.to_string())
        }
        (Operation::Update | Operation::Upsert, Some(found)) => {
            match client.update(project, found.id, &payload) {
                Ok(updated) => ApplyOutcome {
                    name: updated.name,
                    operation,
                    status: OutcomeStatus::Updated,
                    remote_id: Some(updated.id),
                    message: None,
                },
                Err(err) => ApplyOutcome::failure(
                    payload.name,
                    operation,
                    OutcomeStatus::Error,
                    err.to_string(),
                ),
            }
        }
    }
}
