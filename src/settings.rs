//! Project settings store.

use serde::Serialize;

use crate::fields::{DEFAULT_PROJECT_NAME, DEFAULT_PROJECT_TYPE};

/// Project name and type shown in the board header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsStore {
    project_name: String,
    project_type: String,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_NAME, DEFAULT_PROJECT_TYPE)
    }
}

impl SettingsStore {
    pub fn new(project_name: &str, project_type: &str) -> Self {
        SettingsStore {
            project_name: project_name.to_string(),
            project_type: project_type.to_string(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_type(&self) -> &str {
        &self.project_type
    }

    /// Overwrite both fields. Empty strings are accepted.
    pub fn update_project(&mut self, name: &str, project_type: &str) {
        tracing::debug!(project_name = name, project_type, "updating project settings");
        self.project_name = name.to_string();
        self.project_type = project_type.to_string();
    }
}
