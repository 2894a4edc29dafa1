use anyhow::{Context as AnyhowContext, Result, bail};
use dialoguer::Select;

use adokit::Client;

use crate::Context;
use crate::cli::ApplyArgs;
use crate::config::Settings;
use crate::engine::{ApplyOutcome, ApplySummary, Operation, OutcomeStatus, reconcile_one};
use crate::schema::VariableGroupDefinition;
use crate::ui;

/// Apply definition files against the project, one at a time, in the order
/// they were given. A failed file is reported and the rest still run.
pub fn run(ctx: &Context, settings: &Settings, args: ApplyArgs) -> Result<()> {
    let operation = match args.op {
        Some(op) => op.into(),
        None => pick_operation()?,
    };

    ui::header(&format!("Apply Variable Groups ({operation})"));

    let client = Client::new(&settings.org_url, &settings.token);
    let project = client
        .resolve_project(&settings.project)
        .context("Could not resolve project")?;
    if !ctx.quiet {
        ui::kv("Organization", client.org_url());
        ui::kv("Project", &project.name);
    }
    println!();

    let mut summary = ApplySummary::default();
    for path in &args.files {
        if ctx.verbose > 0 {
            ui::dim(&format!("Loading {}", path.display()));
        }
        let outcome = match VariableGroupDefinition::load(path) {
            Ok(definition) => reconcile_one(&client, &project, &definition, operation),
            Err(err) => ApplyOutcome::failure(
                path.display().to_string(),
                operation,
                OutcomeStatus::Error,
                format!("{err:#}"),
            ),
        };
        render_outcome(&outcome);
        summary.add(&outcome);
    }

    println!();
    if summary.is_success() {
        ui::success(&format!(
            "{} created, {} updated",
            summary.created, summary.updated
        ));
        Ok(())
    } else {
        bail!(
            "{} of {} definitions failed",
            summary.failed,
            summary.total()
        );
    }
}

fn render_outcome(outcome: &ApplyOutcome) {
    match outcome.status {
        OutcomeStatus::Created => ui::success(&format!(
            "{}: created (id {})",
            outcome.name,
            outcome.remote_id.unwrap_or_default()
        )),
        OutcomeStatus::Updated => ui::success(&format!(
            "{}: updated (id {})",
            outcome.name,
            outcome.remote_id.unwrap_or_default()
        )),
        OutcomeStatus::Conflict | OutcomeStatus::NotFound | OutcomeStatus::Error => {
            ui::error(&format!(
                "{}: {}",
                outcome.name,
                outcome.message.as_deref().unwrap_or("failed")
            ));
        }
    }
}

/// Interactive operation picker, used when --op is omitted.
fn pick_operation() -> Result<Operation> {
    let operations = [Operation::Create, Operation::Update, Operation::Upsert];
    let choice = Select::new()
        .with_prompt("Operation")
        .items(&operations.map(Operation::as_str))
        .default(0)
        .interact()
        .context("Failed to read operation choice")?;
    Ok(operations[choice])
}
