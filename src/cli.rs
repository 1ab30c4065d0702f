use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::cmd::Commands;
use crate::fields::{DEFAULT_PROJECT_NAME, DEFAULT_PROJECT_TYPE};

/// Kanban issue board in the terminal.
/// Board state lives in memory only and is reseeded on every start.
#[derive(Parser)]
#[command(name = "kb", version, about = "Kanban issue board")]
pub struct Cli {
    /// Initial project name.
    #[arg(long, global = true, env = "KB_PROJECT_NAME", default_value = DEFAULT_PROJECT_NAME)]
    pub project_name: String,

    /// Initial project type.
    #[arg(long, global = true, env = "KB_PROJECT_TYPE", default_value = DEFAULT_PROJECT_TYPE)]
    pub project_type: String,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Defaults to `ui`.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
