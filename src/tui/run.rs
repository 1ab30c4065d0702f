//! Board TUI entry point and terminal setup.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::settings::SettingsStore;
use crate::store::IssueStore;
use crate::tui::board::BoardApp;

/// Initialise and run the board interface over the given stores.
/// Returns the stores as the user left them.
pub fn run_board_tui(
    issues: IssueStore,
    settings: SettingsStore,
) -> io::Result<(IssueStore, SettingsStore)> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = BoardApp::new(issues, settings);
    tracing::info!("board opened");
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(app.into_stores())
}
