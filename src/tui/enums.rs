//! Enumerations for TUI state management.

/// Which screen or modal currently receives input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Board,
    Dragging,
    AddIssue,
    EditIssue,
    ProjectSettings,
    ConfirmDelete,
    Help,
}

/// Result of handling one key press.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyOutcome {
    Continue,
    Quit,
}
