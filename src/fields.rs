//! Well-known labels and column identifiers.
//!
//! Issue type, priority and status are free-form strings on `Task`; these are
//! the values the seed board uses and the issue form offers.

/// Column every new issue lands in.
pub const BACKLOG_COLUMN_ID: &str = "backlog";

/// The fixed board layout, left to right: (id, title).
pub const BOARD_COLUMNS: [(&str, &str); 4] = [
    (BACKLOG_COLUMN_ID, "Backlog"),
    ("todo", "To Do"),
    ("inprogress", "In Progress"),
    ("done", "Done"),
];

/// Issue types offered by the form.
pub const ISSUE_TYPES: [&str; 3] = ["Bug", "Feature", "Task"];

/// Priorities offered by the form, most urgent first.
pub const PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];

/// Status given to issues created through the form.
pub const DEFAULT_STATUS: &str = "To Do";

pub const DEFAULT_ISSUE_TYPE: &str = "Task";
pub const DEFAULT_PRIORITY: &str = "Medium";

pub const DEFAULT_PROJECT_NAME: &str = "Alpha Project";
pub const DEFAULT_PROJECT_TYPE: &str = "Software project";
