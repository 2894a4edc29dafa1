//! Reconciliation engine - dispatch, batch delete, and id parsing.
//!
//! The CLI layer resolves configuration and loads definitions; everything
//! that decides what happens against the remote service lives here.

pub mod delete;
pub mod dispatcher;
pub mod idset;

pub use delete::{AutoConfirm, AutoDecline, ConfirmCallback, DeleteSummary};
pub use dispatcher::{ApplyOutcome, ApplySummary, Operation, OutcomeStatus, reconcile_one};
pub use idset::parse_id_set;
