use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;

use adokit::{Client, VariableGroupRef};

use crate::Context;
use crate::config::Settings;
use crate::ui;

pub fn run(_ctx: &Context, settings: &Settings) -> Result<()> {
    ui::header("Variable Groups");

    let client = Client::new(&settings.org_url, &settings.token);
    let project = client
        .resolve_project(&settings.project)
        .context("Could not resolve project")?;

    let listing = client
        .list_all(&project)
        .context("Could not list variable groups")?;
    render_listing(&project.name, &listing);

    Ok(())
}

/// Render a variable group listing sorted by id.
pub fn render_listing(project: &str, listing: &[VariableGroupRef]) {
    if listing.is_empty() {
        ui::info(&format!("No variable groups in project '{project}'."));
        return;
    }

    let mut sorted: Vec<&VariableGroupRef> = listing.iter().collect();
    sorted.sort_by_key(|group| group.id);

    for group in sorted {
        println!("  {}  {}", format!("{:>6}", group.id).cyan(), group.name);
    }
    println!();
    ui::dim(&format!("{} variable group(s) in '{project}'", listing.len()));
}
