mod cli;
mod commands;
mod config;
mod engine;
mod schema;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::{FileConfig, Settings};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    if let Command::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "vargo", &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::resolve(cli.org_url, cli.project, cli.token, FileConfig::load()?)?;

    match cli.command {
        Command::Apply(args) => commands::apply::run(&ctx, &settings, args),
        Command::List => commands::list::run(&ctx, &settings),
        Command::Delete(args) => commands::delete::run(&ctx, &settings, args),
        Command::Completions { .. } => Ok(()),
    }
}
