//! Scripted store mutations.
//!
//! A script is a JSON array of operations, each tagged by `"op"`:
//!
//! ```json
//! [
//!   {"op": "move_task", "task_id": 1, "source_column_id": "backlog",
//!    "target_column_id": "todo", "position": 0},
//!   {"op": "delete_task", "task_id": 8, "column_id": "done"},
//!   {"op": "update_project", "name": "Beta", "type": "Service desk"}
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::settings::SettingsStore;
use crate::store::{IssueStore, MoveRequest, UpdateRequest};
use crate::task::Task;

/// One store operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    AddIssue {
        task: Task,
    },
    MoveTask(MoveRequest),
    DeleteTask {
        task_id: u64,
        column_id: String,
    },
    UpdateTask(UpdateRequest),
    UpdateProject {
        name: String,
        #[serde(rename = "type")]
        project_type: String,
    },
}

impl Mutation {
    /// Apply with the stores' silent semantics: misses are no-ops.
    pub fn apply(&self, issues: &mut IssueStore, settings: &mut SettingsStore) {
        let _ = self.try_apply(issues, settings);
    }

    /// Apply through the checked store operations.
    pub fn try_apply(&self, issues: &mut IssueStore, settings: &mut SettingsStore) -> StoreResult<()> {
        match self {
            Mutation::AddIssue { task } => issues.try_add_issue(task.clone()).map(drop),
            Mutation::MoveTask(request) => issues.try_move_task(request).map(drop),
            Mutation::DeleteTask { task_id, column_id } => {
                issues.try_delete_task(*task_id, column_id).map(drop)
            }
            Mutation::UpdateTask(request) => issues.try_update_task(request.clone()).map(drop),
            Mutation::UpdateProject { name, project_type } => {
                settings.update_project(name, project_type);
                Ok(())
            }
        }
    }

    /// Short name of the operation, as written in scripts.
    pub fn op_name(&self) -> &'static str {
        match self {
            Mutation::AddIssue { .. } => "add_issue",
            Mutation::MoveTask(_) => "move_task",
            Mutation::DeleteTask { .. } => "delete_task",
            Mutation::UpdateTask(_) => "update_task",
            Mutation::UpdateProject { .. } => "update_project",
        }
    }
}

/// Parse a JSON array of mutations.
pub fn parse_script(input: &str) -> Result<Vec<Mutation>, serde_json::Error> {
    serde_json::from_str(input)
}
