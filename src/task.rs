//! Task and column data structures.
//!
//! A `Task` is a single issue on the board; a `Column` is an ordered bucket of
//! tasks representing one workflow stage. Ordering inside a column is
//! significant: index 0 is the top of the column.

use serde::{Deserialize, Serialize};

/// An issue record with identity, descriptive fields, and workflow status.
///
/// `kind`, `priority` and `status` are free-form labels. By convention
/// `status` mirrors the title of the column holding the task, but nothing
/// enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub reporter: String,
    #[serde(default)]
    pub assignees: Vec<String>,
}

/// A named, ordered bucket of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    /// Create an empty column.
    pub fn new(id: &str, title: &str) -> Self {
        Column {
            id: id.to_string(),
            title: title.to_string(),
            tasks: Vec::new(),
        }
    }

    /// Create a column holding the given tasks, in order.
    pub fn with_tasks(id: &str, title: &str, tasks: Vec<Task>) -> Self {
        Column {
            id: id.to_string(),
            title: title.to_string(),
            tasks,
        }
    }

    /// Index of the first task with this id.
    pub fn position_of(&self, task_id: u64) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// First task with this id.
    pub fn get(&self, task_id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Split a comma-separated list of names, trimming each and dropping empties.
/// Order and duplicates are kept.
pub fn parse_assignees(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format assignees for display, `-` when there are none.
pub fn format_assignees(assignees: &[String]) -> String {
    if assignees.is_empty() {
        "-".into()
    } else {
        assignees.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignees() {
        assert_eq!(parse_assignees("Person1, Person2"), vec!["Person1", "Person2"]);
        assert_eq!(parse_assignees(" Bob ,, Alice,Bob "), vec!["Bob", "Alice", "Bob"]);
        assert!(parse_assignees("").is_empty());
        assert!(parse_assignees(" , ").is_empty());
    }

    #[test]
    fn test_task_serialises_kind_as_type() {
        let task = Task {
            id: 9,
            kind: "Task".into(),
            title: "Write unit tests".into(),
            description: None,
            priority: "High".into(),
            status: "To Do".into(),
            reporter: "Dev".into(),
            assignees: vec!["Tester".into()],
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "Task");
        assert!(json.get("kind").is_none());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_task_deserialises_without_optional_fields() {
        let task: Task = serde_json::from_str(
            r#"{"id":3,"type":"Bug","title":"t","priority":"Low","status":"Done","reporter":"Eve"}"#,
        )
        .unwrap();
        assert_eq!(task.description, None);
        assert!(task.assignees.is_empty());
    }

    #[test]
    fn test_position_of_finds_first_match() {
        let mut a = Task {
            id: 1,
            kind: "Bug".into(),
            title: "a".into(),
            description: None,
            priority: "High".into(),
            status: "To Do".into(),
            reporter: "Alice".into(),
            assignees: vec![],
        };
        let b = a.clone();
        a.title = "first".into();
        let column = Column::with_tasks("todo", "To Do", vec![a, b]);
        assert_eq!(column.position_of(1), Some(0));
        assert_eq!(column.get(1).map(|t| t.title.as_str()), Some("first"));
        assert_eq!(column.position_of(2), None);
    }
}
