//! # kb - Kanban Issue Board
//!
//! A terminal kanban board for tracking issues: columns holding tasks,
//! keyboard drag-and-drop between columns, and modal forms for creating and
//! editing issues.
//!
//! ## Key Features
//!
//! - **Fixed Workflow Columns**: Backlog → To Do → In Progress → Done
//! - **Drag-and-Drop**: Pick a card up with Space, carry it to any slot, drop it
//! - **Issue Forms**: Type, priority, reporter, and any number of assignees
//! - **Scriptable**: Apply JSON mutation scripts to the board without a terminal
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the board
//! kb
//!
//! # Print the seeded board
//! kb show
//!
//! # Look up one issue and the column holding it
//! kb show --task 6
//!
//! # Replay a script of moves and edits, failing on the first miss
//! kb apply moves.json --strict
//! ```
//!
//! The board is held in memory only. Every run starts from the same seed
//! board and nothing is written back on exit.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod dnd;
pub mod error;
pub mod fields;
pub mod logging;
pub mod mutation;
pub mod settings;
pub mod store;
pub mod task;
pub mod tui {
    pub mod board;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod issue_form;
    pub mod run;
    pub mod settings_form;
}

use cli::Cli;
use cmd::*;
use settings::SettingsStore;

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Ui { dump: false });
    let owns_terminal = matches!(command, Commands::Ui { .. });

    let log_guard = match logging::init(cli.log_file.as_deref(), cli.verbose, owns_terminal) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {e:#}");
            std::process::exit(1);
        }
    };

    let settings = SettingsStore::new(&cli.project_name, &cli.project_type);

    let result = match command {
        Commands::Ui { dump } => cmd_ui(settings, dump),
        Commands::Show { json, column, task } => {
            cmd_show(&settings, json, column.as_deref(), task)
        }
        Commands::Apply { script, strict, json } => cmd_apply(settings, &script, strict, json),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        // exit() skips destructors; flush the file writer first.
        drop(log_guard);
        std::process::exit(1);
    }
}
