//! Project settings form.

use crate::settings::SettingsStore;
use crate::tui::input::InputField;

pub const NAME_ORDER: usize = 0;
pub const TYPE_ORDER: usize = 1;

/// Two text fields: project name and project type. No validation.
pub struct SettingsForm {
    pub name: InputField,
    pub project_type: InputField,
    pub current_field: usize,
}

impl SettingsForm {
    pub fn from_settings(settings: &SettingsStore) -> Self {
        let mut form = SettingsForm {
            name: InputField::with_value(settings.project_name()),
            project_type: InputField::with_value(settings.project_type()),
            current_field: NAME_ORDER,
        };
        form.update_active_field();
        form
    }

    fn current_mut(&mut self) -> &mut InputField {
        if self.current_field == NAME_ORDER {
            &mut self.name
        } else {
            &mut self.project_type
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % 2;
        self.update_active_field();
    }

    pub fn update_active_field(&mut self) {
        self.name.active = self.current_field == NAME_ORDER;
        self.project_type.active = self.current_field == TYPE_ORDER;
    }

    pub fn handle_char(&mut self, c: char) {
        self.current_mut().handle_char(c);
    }

    pub fn handle_backspace(&mut self) {
        self.current_mut().handle_backspace();
    }

    pub fn handle_delete(&mut self) {
        self.current_mut().handle_delete();
    }

    pub fn handle_left_right(&mut self, right: bool) {
        let field = self.current_mut();
        if right {
            field.move_cursor_right();
        } else {
            field.move_cursor_left();
        }
    }

    /// Write both values into the store.
    pub fn submit(&self, settings: &mut SettingsStore) {
        settings.update_project(&self.name.value, &self.project_type.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_and_submit() {
        let mut settings = SettingsStore::default();
        let mut form = SettingsForm::from_settings(&settings);
        assert!(form.name.active);

        for _ in 0.."Alpha Project".len() {
            form.handle_backspace();
        }
        for c in "Beta".chars() {
            form.handle_char(c);
        }
        form.next_field();
        assert!(form.project_type.active);
        form.submit(&mut settings);

        assert_eq!(settings.project_name(), "Beta");
        assert_eq!(settings.project_type(), "Software project");
    }

    #[test]
    fn test_empty_values_are_accepted() {
        let mut settings = SettingsStore::new("A", "B");
        let mut form = SettingsForm::from_settings(&settings);
        form.handle_backspace();
        form.next_field();
        form.handle_backspace();
        form.submit(&mut settings);
        assert_eq!(settings.project_name(), "");
        assert_eq!(settings.project_type(), "");
    }
}
