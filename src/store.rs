//! The issue store: sole owner of the board and its mutation surface.
//!
//! Every mutation comes in two flavours. The plain methods (`add_issue`,
//! `move_task`, `delete_task`, `update_task`) are silent: any lookup miss turns
//! the call into a no-op and nothing is reported. The `try_*` twins run the
//! same code path but return a `StoreResult` so callers can detect the miss.

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::fields::{BACKLOG_COLUMN_ID, BOARD_COLUMNS};
use crate::task::{Column, Task};

/// Arguments for `IssueStore::move_task`.
///
/// `position` is signed: anything outside `[0, target length]` appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub task_id: u64,
    pub source_column_id: String,
    pub target_column_id: String,
    pub position: i64,
}

/// Arguments for `IssueStore::update_task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub id: u64,
    pub column_id: String,
    pub updated_task: Task,
}

/// In-memory board: an ordered list of columns, leftmost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueStore {
    columns: Vec<Column>,
}

impl Default for IssueStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl IssueStore {
    /// The standard board: four fixed columns with two seed tasks each.
    pub fn seeded() -> Self {
        IssueStore {
            columns: seed_columns(),
        }
    }

    /// A board with an arbitrary column layout.
    pub fn from_columns(columns: Vec<Column>) -> Self {
        IssueStore { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by id.
    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    fn column_index(&self, column_id: &str) -> StoreResult<usize> {
        self.columns
            .iter()
            .position(|c| c.id == column_id)
            .ok_or_else(|| StoreError::ColumnNotFound(column_id.to_string()))
    }

    fn task_index(&self, column_index: usize, task_id: u64) -> StoreResult<usize> {
        let column = &self.columns[column_index];
        column.position_of(task_id).ok_or_else(|| StoreError::TaskNotFound {
            task_id,
            column_id: column.id.clone(),
        })
    }

    /// Find the first task with this id anywhere on the board, scanning
    /// columns left to right.
    pub fn find_task(&self, task_id: u64) -> Option<(&Column, &Task)> {
        self.columns
            .iter()
            .find_map(|c| c.get(task_id).map(|t| (c, t)))
    }

    /// Total number of tasks across all columns.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    /// Generate the next available task ID.
    pub fn next_task_id(&self) -> u64 {
        self.columns
            .iter()
            .flat_map(|c| c.tasks.iter())
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Append `task` unchanged to the backlog. No-op if there is no backlog.
    pub fn add_issue(&mut self, task: Task) {
        let _ = self.try_add_issue(task);
    }

    /// Append `task` to the backlog, returning the index it landed at.
    /// Duplicate ids are not checked.
    pub fn try_add_issue(&mut self, task: Task) -> StoreResult<usize> {
        let column_index = self.column_index(BACKLOG_COLUMN_ID)?;
        let column = &mut self.columns[column_index];
        tracing::debug!(task_id = task.id, column_id = %column.id, "adding issue");
        column.tasks.push(task);
        Ok(column.tasks.len() - 1)
    }

    /// Move a task between (or within) columns. No-op on any lookup miss.
    pub fn move_task(&mut self, request: &MoveRequest) {
        let _ = self.try_move_task(request);
    }

    /// Move a task, returning its final index in the target column.
    ///
    /// The task is looked up in the source column only. Its status is always
    /// overwritten with the target column's title, even when source and target
    /// are the same column.
    pub fn try_move_task(&mut self, request: &MoveRequest) -> StoreResult<usize> {
        let source_index = self.column_index(&request.source_column_id)?;
        let target_index = self.column_index(&request.target_column_id)?;
        let task_index = self.task_index(source_index, request.task_id)?;

        let mut task = self.columns[source_index].tasks.remove(task_index);
        let target = &mut self.columns[target_index];
        task.status = target.title.clone();

        // Bounds are checked after removal, so a same-column move sees the
        // shortened list.
        let placed = match usize::try_from(request.position) {
            Ok(position) if position <= target.tasks.len() => {
                target.tasks.insert(position, task);
                position
            }
            _ => {
                target.tasks.push(task);
                target.tasks.len() - 1
            }
        };

        tracing::debug!(
            task_id = request.task_id,
            source = %request.source_column_id,
            target = %request.target_column_id,
            position = placed,
            "moved task"
        );
        Ok(placed)
    }

    /// Remove a task from a column. No-op on any lookup miss.
    pub fn delete_task(&mut self, task_id: u64, column_id: &str) {
        let _ = self.try_delete_task(task_id, column_id);
    }

    /// Remove the first task with `task_id` from the column, returning it.
    pub fn try_delete_task(&mut self, task_id: u64, column_id: &str) -> StoreResult<Task> {
        let column_index = self.column_index(column_id)?;
        let task_index = self.task_index(column_index, task_id)?;
        tracing::debug!(task_id, column_id, "deleting task");
        Ok(self.columns[column_index].tasks.remove(task_index))
    }

    /// Replace a task wholesale. No-op on any lookup miss.
    pub fn update_task(&mut self, request: UpdateRequest) {
        let _ = self.try_update_task(request);
    }

    /// Replace the task matched by `request.id` with `request.updated_task`,
    /// returning the old task. Nothing is merged and the new task's own id is
    /// taken as given.
    pub fn try_update_task(&mut self, request: UpdateRequest) -> StoreResult<Task> {
        let column_index = self.column_index(&request.column_id)?;
        let task_index = self.task_index(column_index, request.id)?;
        tracing::debug!(
            task_id = request.id,
            column_id = %request.column_id,
            new_id = request.updated_task.id,
            "updating task"
        );
        let slot = &mut self.columns[column_index].tasks[task_index];
        Ok(std::mem::replace(slot, request.updated_task))
    }
}

fn seed_task(
    id: u64,
    kind: &str,
    title: &str,
    description: &str,
    priority: &str,
    status: &str,
    reporter: &str,
    assignees: &[&str],
) -> Task {
    Task {
        id,
        kind: kind.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        priority: priority.to_string(),
        status: status.to_string(),
        reporter: reporter.to_string(),
        assignees: assignees.iter().map(|s| s.to_string()).collect(),
    }
}

fn seed_columns() -> Vec<Column> {
    let login = "Fix login API issue";
    let login_desc = "Users cannot log in due to API failure.";
    let dark = "Implement dark mode";
    let dark_desc = "Add dark mode support for better user experience.";

    let mut tasks = vec![
        vec![
            seed_task(1, "Bug", login, login_desc, "High", "To Do", "Alice", &["Bob"]),
            seed_task(2, "Feature", dark, dark_desc, "Medium", "To Do", "Charlie", &["Alice", "David"]),
        ],
        vec![
            seed_task(3, "Bug", login, login_desc, "High", "To Do", "Alice", &["Bob"]),
            seed_task(4, "Feature", dark, dark_desc, "Medium", "To Do", "Charlie", &["Alice", "David"]),
        ],
        vec![
            seed_task(
                5,
                "Task",
                "Update documentation",
                "Update user guide with new features.",
                "Low",
                "In Progress",
                "Eve",
                &["Frank"],
            ),
            seed_task(
                6,
                "Bug",
                "Fix image upload",
                "Images fail to upload on slow connections.",
                "Medium",
                "In Progress",
                "Grace",
                &["Helen"],
            ),
        ],
        vec![
            seed_task(
                7,
                "Bug",
                "Each issue has a single reporter but can have multiple assignees.",
                login_desc,
                "Medium",
                "Done",
                "Alice",
                &["Bob", "Charlie", "Alice"],
            ),
            seed_task(
                8,
                "Feature",
                "Implement email notifications",
                "Send email notifications for task updates.",
                "High",
                "Done",
                "Ivan",
                &["Jack"],
            ),
        ],
    ]
    .into_iter();

    BOARD_COLUMNS
        .iter()
        .map(|(id, title)| Column::with_tasks(id, title, tasks.next().unwrap_or_default()))
        .collect()
}
