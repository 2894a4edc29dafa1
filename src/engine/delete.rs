//! Batch deletion with confirmation and partial-failure isolation.
//!
//! Unlike the apply path, where each definition stands alone, confirmation
//! here is all-or-nothing for the batch: declining deletes nothing. Once
//! confirmed, each id is deleted independently and one failure does not stop
//! the rest.

use anyhow::Result;
use colored::Colorize;

use adokit::{Client, ProjectRef, VariableGroupRef};

use crate::engine::idset::parse_id_set;
use crate::ui;

/// Asks the operator to confirm an action.
///
/// The CLI backs this with an interactive prompt; tests use [`AutoConfirm`]
/// or [`AutoDecline`].
pub trait ConfirmCallback {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Always confirms.
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Always declines.
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}

/// Outcome of one batch delete run.
#[derive(Debug, Default)]
pub struct DeleteSummary {
    /// Ids parsed from the operator's expression, in input order.
    pub requested: Vec<u64>,
    /// Ids deleted successfully.
    pub deleted: Vec<u64>,
    /// Requested ids with no matching group in the listing.
    pub not_found: Vec<u64>,
    /// Ids whose delete failed, with the error message.
    pub failed: Vec<(u64, String)>,
    /// Whether the operator declined the confirmation.
    pub cancelled: bool,
}

impl DeleteSummary {
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failed.is_empty()
    }
}

/// Partition requested ids against the remote listing.
///
/// Returns the groups to delete, sorted ascending by id, and the requested
/// ids that matched nothing.
fn partition(
    requested: &[u64],
    listing: &[VariableGroupRef],
) -> (Vec<VariableGroupRef>, Vec<u64>) {
    let mut to_delete = Vec::new();
    let mut not_found = Vec::new();

    for &id in requested {
        match listing.iter().find(|group| group.id == id) {
            Some(group) => to_delete.push(group.clone()),
            None => not_found.push(id),
        }
    }

    to_delete.sort_by_key(|group| group.id);
    (to_delete, not_found)
}

/// Run the confirm-and-delete flow over a raw identifier expression.
///
/// The caller has already fetched and rendered the listing. Deletions happen
/// in ascending id order; failures are reported per id and the batch keeps
/// going.
pub fn run(
    client: &Client,
    project: &ProjectRef,
    listing: &[VariableGroupRef],
    expression: &str,
    force: bool,
    confirm: &mut dyn ConfirmCallback,
) -> Result<DeleteSummary> {
    let requested = parse_id_set(expression);
    if requested.is_empty() {
        ui::info("No valid ids in the expression. Nothing to delete.");
        return Ok(DeleteSummary::default());
    }

    let (to_delete, not_found) = partition(&requested, listing);

    let mut summary = DeleteSummary {
        requested,
        not_found,
        ..Default::default()
    };

    for &id in &summary.not_found {
        ui::warn(&format!("Id {id} not found in project; skipping"));
    }

    if to_delete.is_empty() {
        ui::info("None of the requested ids exist. Nothing to delete.");
        return Ok(summary);
    }

    println!();
    println!(
        "  {} This will DELETE {} variable group(s) from '{}':",
        "⚠".yellow(),
        to_delete.len(),
        project.name
    );
    for group in &to_delete {
        println!("  {} {} ({})", "−".red(), group.name, group.id);
    }
    println!();

    if !force && !confirm.confirm("Delete these variable groups?")? {
        ui::warn("Aborted. No changes made.");
        summary.cancelled = true;
        return Ok(summary);
    }

    for group in &to_delete {
        match client.delete(project, group) {
            Ok(()) => {
                ui::success(&format!("Deleted '{}' ({})", group.name, group.id));
                summary.deleted.push(group.id);
            }
            Err(err) => {
                ui::error(&format!("Could not delete '{}' ({}): {err}", group.name, group.id));
                summary.failed.push((group.id, err.to_string()));
            }
        }
    }

    Ok(summary)
}
