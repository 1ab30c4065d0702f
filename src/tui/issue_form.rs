//! Issue form handling for the terminal user interface.
//!
//! This module provides the `IssueForm` used by both the "new issue" and the
//! "edit issue" modals: field ordering, selector cycling, validation, and
//! conversion to a `Task`.

use thiserror::Error;

use crate::fields::{DEFAULT_ISSUE_TYPE, DEFAULT_PRIORITY, DEFAULT_STATUS, ISSUE_TYPES, PRIORITIES};
use crate::task::{parse_assignees, Task};
use crate::tui::input::InputField;

/// Field order in the form, top to bottom.
pub const TITLE_ORDER: usize = 0;
pub const TYPE_ORDER: usize = 1;
pub const PRIORITY_ORDER: usize = 2;
pub const STATUS_ORDER: usize = 3;
pub const REPORTER_ORDER: usize = 4;
pub const ASSIGNEES_ORDER: usize = 5;
pub const DESCRIPTION_ORDER: usize = 6;
pub const FIELD_COUNT: usize = 7;

/// Why a form could not be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Reporter is required")]
    MissingReporter,
}

/// Form state for creating or editing an issue.
pub struct IssueForm {
    pub title: InputField,
    pub reporter: InputField,
    pub assignees: InputField,
    pub description: InputField,
    pub kind: usize,
    pub priority: usize,
    pub status: usize,
    pub kinds: Vec<String>,
    pub priorities: Vec<String>,
    pub statuses: Vec<String>,
    pub current_field: usize,
    /// Id of the task being edited; `None` for a new issue.
    pub editing_id: Option<u64>,
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Index of `value` in `options`, appending it first when it is not offered.
fn select_or_insert(options: &mut Vec<String>, value: &str) -> usize {
    match options.iter().position(|o| o == value) {
        Some(i) => i,
        None => {
            options.push(value.to_string());
            options.len() - 1
        }
    }
}

fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (index + 1) % len
    } else if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

impl IssueForm {
    /// Empty form for a new issue. `statuses` are the board's column titles.
    pub fn new(statuses: &[&str]) -> Self {
        let mut statuses = labels(statuses);
        let status = select_or_insert(&mut statuses, DEFAULT_STATUS);
        let kinds = labels(&ISSUE_TYPES);
        let priorities = labels(&PRIORITIES);
        let mut form = Self {
            title: InputField::new(),
            reporter: InputField::new(),
            assignees: InputField::new(),
            description: InputField::new(),
            kind: kinds.iter().position(|k| k == DEFAULT_ISSUE_TYPE).unwrap_or(0),
            priority: priorities.iter().position(|p| p == DEFAULT_PRIORITY).unwrap_or(0),
            status,
            kinds,
            priorities,
            statuses,
            current_field: TITLE_ORDER,
            editing_id: None,
        };
        form.update_active_field();
        form
    }

    /// Form populated from an existing task. Labels the form does not offer
    /// are added to the selector so an unchanged submit keeps them.
    pub fn from_task(task: &Task, statuses: &[&str]) -> Self {
        let mut form = Self::new(statuses);
        form.title = InputField::with_value(&task.title);
        form.reporter = InputField::with_value(&task.reporter);
        form.assignees = InputField::with_value(&task.assignees.join(", "));
        form.description = InputField::with_value(task.description.as_deref().unwrap_or(""));
        form.kind = select_or_insert(&mut form.kinds, &task.kind);
        form.priority = select_or_insert(&mut form.priorities, &task.priority);
        form.status = select_or_insert(&mut form.statuses, &task.status);
        form.editing_id = Some(task.id);
        form.update_active_field();
        form
    }

    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }

    fn text_field_mut(&mut self, order: usize) -> Option<&mut InputField> {
        match order {
            TITLE_ORDER => Some(&mut self.title),
            REPORTER_ORDER => Some(&mut self.reporter),
            ASSIGNEES_ORDER => Some(&mut self.assignees),
            DESCRIPTION_ORDER => Some(&mut self.description),
            _ => None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = cycle(self.current_field, FIELD_COUNT, false);
        self.update_active_field();
    }

    pub fn update_active_field(&mut self) {
        for field in [
            &mut self.title,
            &mut self.reporter,
            &mut self.assignees,
            &mut self.description,
        ] {
            field.active = false;
        }
        let current = self.current_field;
        if let Some(field) = self.text_field_mut(current) {
            field.active = true;
        }
    }

    pub fn handle_char(&mut self, c: char) {
        let current = self.current_field;
        if let Some(field) = self.text_field_mut(current) {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        let current = self.current_field;
        if let Some(field) = self.text_field_mut(current) {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        let current = self.current_field;
        if let Some(field) = self.text_field_mut(current) {
            field.handle_delete();
        }
    }

    /// Move the cursor in text fields, or cycle the value of a selector.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            TYPE_ORDER => self.kind = cycle(self.kind, self.kinds.len(), right),
            PRIORITY_ORDER => self.priority = cycle(self.priority, self.priorities.len(), right),
            STATUS_ORDER => self.status = cycle(self.status, self.statuses.len(), right),
            order => {
                if let Some(field) = self.text_field_mut(order) {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    pub fn selected_kind(&self) -> &str {
        self.kinds.get(self.kind).map(String::as_str).unwrap_or(DEFAULT_ISSUE_TYPE)
    }

    pub fn selected_priority(&self) -> &str {
        self.priorities.get(self.priority).map(String::as_str).unwrap_or(DEFAULT_PRIORITY)
    }

    pub fn selected_status(&self) -> &str {
        self.statuses.get(self.status).map(String::as_str).unwrap_or(DEFAULT_STATUS)
    }

    /// Check the required fields.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.title.value.trim().is_empty() {
            return Err(FormError::MissingTitle);
        }
        if self.reporter.value.trim().is_empty() {
            return Err(FormError::MissingReporter);
        }
        Ok(())
    }

    /// Build the task this form describes. A new issue takes `new_id`; an
    /// edit keeps the id of the task it was opened from.
    pub fn to_task(&self, new_id: u64) -> Result<Task, FormError> {
        self.validate()?;
        let description = self.description.value.trim();
        Ok(Task {
            id: self.editing_id.unwrap_or(new_id),
            kind: self.selected_kind().to_string(),
            title: self.title.value.trim().to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            priority: self.selected_priority().to_string(),
            status: self.selected_status().to_string(),
            reporter: self.reporter.value.trim().to_string(),
            assignees: parse_assignees(&self.assignees.value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUSES: [&str; 4] = ["Backlog", "To Do", "In Progress", "Done"];

    fn type_into(form: &mut IssueForm, text: &str) {
        for c in text.chars() {
            form.handle_char(c);
        }
    }

    fn go_to(form: &mut IssueForm, order: usize) {
        while form.current_field != order {
            form.next_field();
        }
    }

    #[test]
    fn test_new_form_defaults() {
        let form = IssueForm::new(&STATUSES);
        assert_eq!(form.selected_kind(), "Task");
        assert_eq!(form.selected_priority(), "Medium");
        assert_eq!(form.selected_status(), "To Do");
        assert!(form.title.active);
        assert!(!form.is_edit());
    }

    #[test]
    fn test_requires_title_and_reporter() {
        let mut form = IssueForm::new(&STATUSES);
        assert_eq!(form.to_task(9), Err(FormError::MissingTitle));

        type_into(&mut form, "Test Issue");
        assert_eq!(form.to_task(9), Err(FormError::MissingReporter));

        go_to(&mut form, REPORTER_ORDER);
        type_into(&mut form, "   ");
        assert_eq!(form.validate(), Err(FormError::MissingReporter));
    }

    #[test]
    fn test_builds_task_from_fields() {
        let mut form = IssueForm::new(&STATUSES);
        type_into(&mut form, "Test Issue");
        go_to(&mut form, TYPE_ORDER);
        form.handle_left_right(false); // Task -> Feature
        go_to(&mut form, PRIORITY_ORDER);
        form.handle_left_right(true); // Medium -> Low
        go_to(&mut form, REPORTER_ORDER);
        type_into(&mut form, "Tester");
        go_to(&mut form, ASSIGNEES_ORDER);
        type_into(&mut form, "Person1, Person2");

        let task = form.to_task(9).unwrap();
        assert_eq!(task.id, 9);
        assert_eq!(task.kind, "Feature");
        assert_eq!(task.priority, "Low");
        assert_eq!(task.status, "To Do");
        assert_eq!(task.reporter, "Tester");
        assert_eq!(task.assignees, vec!["Person1", "Person2"]);
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_edit_round_trips_task() {
        let task = Task {
            id: 7,
            kind: "Chore".into(),
            title: "Each issue has a single reporter".into(),
            description: Some("Users cannot log in.".into()),
            priority: "Medium".into(),
            status: "Done".into(),
            reporter: "Alice".into(),
            assignees: vec!["Bob".into(), "Charlie".into(), "Alice".into()],
        };
        let form = IssueForm::from_task(&task, &STATUSES);
        assert!(form.is_edit());
        assert_eq!(form.to_task(100).unwrap(), task);
    }

    #[test]
    fn test_prev_field_wraps() {
        let mut form = IssueForm::new(&STATUSES);
        form.prev_field();
        assert_eq!(form.current_field, DESCRIPTION_ORDER);
        assert!(form.description.active);
        assert!(!form.title.active);
    }
}
