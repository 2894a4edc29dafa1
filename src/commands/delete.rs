use anyhow::{Context as AnyhowContext, Result, bail};
use dialoguer::{Confirm, Input};

use adokit::Client;

use crate::Context;
use crate::cli::DeleteArgs;
use crate::config::Settings;
use crate::engine::ConfirmCallback;
use crate::engine::delete as batch;
use crate::ui;

/// Interactive confirmation backed by dialoguer.
struct PromptConfirm;

impl ConfirmCallback for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}

pub fn run(_ctx: &Context, settings: &Settings, args: DeleteArgs) -> Result<()> {
    ui::header("Delete Variable Groups");

    let client = Client::new(&settings.org_url, &settings.token);
    let project = client
        .resolve_project(&settings.project)
        .context("Could not resolve project")?;

    // Show the current listing before asking for ids
    let listing = client
        .list_all(&project)
        .context("Could not list variable groups")?;
    super::list::render_listing(&project.name, &listing);

    let expression = match args.ids {
        Some(expression) => expression,
        None => Input::<String>::new()
            .with_prompt("Ids to delete (e.g. \"11 12,13-15\")")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read id expression")?,
    };

    let summary = batch::run(
        &client,
        &project,
        &listing,
        &expression,
        args.yes,
        &mut PromptConfirm,
    )?;

    if summary.cancelled {
        return Ok(());
    }

    if !summary.deleted.is_empty() || !summary.failed.is_empty() {
        println!();
        ui::dim(&format!(
            "{} deleted, {} not found, {} failed",
            summary.deleted.len(),
            summary.not_found.len(),
            summary.failed.len()
        ));
    }

    if summary.failed.is_empty() {
        Ok(())
    } else {
        bail!("{} deletion(s) failed", summary.failed.len());
    }
}
