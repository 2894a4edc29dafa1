use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::engine::Operation;

#[derive(Parser)]
#[command(name = "vargo")]
#[command(version)]
#[command(about = "Declarative variable group management for Azure DevOps", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Organization base URL, e.g. https://dev.azure.com/contoso
    #[arg(long, env = "VARGO_ORG_URL", global = true)]
    pub org_url: Option<String>,

    /// Project the variable groups belong to
    #[arg(short, long, env = "VARGO_PROJECT", global = true)]
    pub project: Option<String>,

    /// Personal access token for authentication
    #[arg(long, env = "VARGO_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply definition files against the project (create, update, or upsert)
    Apply(ApplyArgs),

    /// List the project's variable groups
    List,

    /// Delete variable groups by id range expression
    Delete(DeleteArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Definition files, one JSON variable group per file
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Operation to perform; prompted for interactively when omitted
    #[arg(short, long, value_enum)]
    pub op: Option<OpArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OpArg {
    Create,
    Update,
    Upsert,
}

impl From<OpArg> for Operation {
    fn from(op: OpArg) -> Self {
        match op {
            OpArg::Create => Self::Create,
            OpArg::Update => Self::Update,
            OpArg::Upsert => Self::Upsert,
        }
    }
}

#[derive(Parser)]
pub struct DeleteArgs {
    /// Identifier expression, e.g. "11 12,13-15"; prompted for when omitted
    pub ids: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
