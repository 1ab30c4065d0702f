//! Kanban board interface.
//!
//! Renders one column per store column and turns key presses into store
//! operations: Space picks a card up and drops it at the highlighted slot,
//! Ctrl+Left/Right throws it onto the neighbouring column, Shift+Up/Down
//! nudges it within its column. Modal forms create and edit issues and change
//! the project settings.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::dnd::{card_drop, column_drop, DragPayload};
use crate::error::StoreError;
use crate::fields::BACKLOG_COLUMN_ID;
use crate::settings::SettingsStore;
use crate::store::{IssueStore, MoveRequest, UpdateRequest};
use crate::task::{format_assignees, Column, Task};
use crate::tui::colors::{priority_color, priority_text_color, DROP_MARKER};
use crate::tui::enums::{AppState, KeyOutcome};
use crate::tui::input::InputField;
use crate::tui::issue_form::{
    IssueForm, ASSIGNEES_ORDER, DESCRIPTION_ORDER, PRIORITY_ORDER, REPORTER_ORDER, STATUS_ORDER,
    TITLE_ORDER, TYPE_ORDER,
};
use crate::tui::settings_form::SettingsForm;

const CARD_HEIGHT: usize = 6;
const ACCENT: Color = Color::Cyan;

/// A card in flight.
#[derive(Debug, Clone)]
pub struct DragState {
    pub payload: DragPayload,
    pub source_column: usize,
    pub source_index: usize,
    pub hover_column: usize,
    /// Insertion slot in the hovered column as displayed: slot `i` sits above
    /// card `i`, slot `len` below the last card.
    pub hover_slot: usize,
}

/// Board application state.
pub struct BoardApp {
    issues: IssueStore,
    settings: SettingsStore,
    state: AppState,
    selected_column: usize,
    selected_card: usize,
    column_scroll_offsets: Vec<usize>,
    status_message: String,
    show_task_detail: bool,
    issue_form: Option<IssueForm>,
    editing_column: Option<String>,
    settings_form: Option<SettingsForm>,
    drag: Option<DragState>,
    pending_delete: Option<(u64, String)>,
}

impl BoardApp {
    pub fn new(issues: IssueStore, settings: SettingsStore) -> Self {
        let column_count = issues.columns().len();
        BoardApp {
            issues,
            settings,
            state: AppState::Board,
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: vec![0; column_count],
            status_message: String::new(),
            show_task_detail: false,
            issue_form: None,
            editing_column: None,
            settings_form: None,
            drag: None,
            pending_delete: None,
        }
    }

    pub fn issues(&self) -> &IssueStore {
        &self.issues
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn selection(&self) -> (usize, usize) {
        (self.selected_column, self.selected_card)
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    #[cfg(test)]
    pub fn issue_form_mut(&mut self) -> Option<&mut IssueForm> {
        self.issue_form.as_mut()
    }

    /// Hand the stores back to the caller.
    pub fn into_stores(self) -> (IssueStore, SettingsStore) {
        (self.issues, self.settings)
    }

    fn column_titles(&self) -> Vec<&str> {
        self.issues.columns().iter().map(|c| c.title.as_str()).collect()
    }

    fn column_at(&self, index: usize) -> Option<&Column> {
        self.issues.columns().get(index)
    }

    fn column_len(&self, index: usize) -> usize {
        self.column_at(index).map(Column::len).unwrap_or(0)
    }

    /// The column and task under the cursor.
    pub fn selected_task(&self) -> Option<(&Column, &Task)> {
        let column = self.column_at(self.selected_column)?;
        column.tasks.get(self.selected_card).map(|t| (column, t))
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Keep column and card indices inside the board.
    fn clamp_selection(&mut self) {
        let column_count = self.issues.columns().len();
        if self.selected_column >= column_count {
            self.selected_column = column_count.saturating_sub(1);
        }
        let len = self.column_len(self.selected_column);
        if len == 0 {
            self.selected_card = 0;
        } else if self.selected_card >= len {
            self.selected_card = len - 1;
        }
    }

    fn select(&mut self, column: usize, card: usize) {
        self.selected_column = column;
        self.selected_card = card;
        self.clamp_selection();
    }

    /// Run a move through the store and follow the card with the cursor.
    fn apply_move(&mut self, request: &MoveRequest) {
        let target_index = self
            .issues
            .columns()
            .iter()
            .position(|c| c.id == request.target_column_id);
        match self.issues.try_move_task(request) {
            Ok(placed) => {
                let title = target_index
                    .and_then(|i| self.column_at(i))
                    .map(|c| c.title.clone())
                    .unwrap_or_default();
                if let Some(column) = target_index {
                    self.select(column, placed);
                }
                self.set_status_message(format!("Moved #{} to {}", request.task_id, title));
            }
            Err(e) => self.report(e),
        }
    }

    fn report(&mut self, error: StoreError) {
        tracing::warn!(%error, "board action rejected");
        self.set_status_message(format!("Not applied: {error}"));
    }

    /// Dispatch one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return KeyOutcome::Quit;
        }
        match self.state {
            AppState::Board => self.handle_board_key(key),
            AppState::Dragging => {
                self.handle_drag_key(key);
                KeyOutcome::Continue
            }
            AppState::AddIssue | AppState::EditIssue => {
                self.handle_form_key(key);
                KeyOutcome::Continue
            }
            AppState::ProjectSettings => {
                self.handle_settings_key(key);
                KeyOutcome::Continue
            }
            AppState::ConfirmDelete => {
                self.handle_confirm_key(key);
                KeyOutcome::Continue
            }
            AppState::Help => {
                self.state = AppState::Board;
                KeyOutcome::Continue
            }
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> KeyOutcome {
        self.clear_status_message();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.show_task_detail {
                    self.show_task_detail = false;
                } else {
                    return KeyOutcome::Quit;
                }
            }
            KeyCode::Enter => {
                self.show_task_detail = !self.show_task_detail && self.selected_task().is_some();
            }

            // Card movement (check modifiers before plain navigation)
            KeyCode::Left if ctrl => self.throw_card(false),
            KeyCode::Right if ctrl => self.throw_card(true),
            KeyCode::Up if shift => self.nudge_card(true),
            KeyCode::Down if shift => self.nudge_card(false),
            KeyCode::Char('K') => self.nudge_card(true),
            KeyCode::Char('J') => self.nudge_card(false),
            KeyCode::Char(' ') => self.start_drag(),

            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.issues.columns().len() {
                    self.selected_column += 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Up => {
                if self.selected_card > 0 {
                    self.selected_card -= 1;
                }
            }
            KeyCode::Down => {
                let len = self.column_len(self.selected_column);
                if len > 0 && self.selected_card < len - 1 {
                    self.selected_card += 1;
                }
            }

            KeyCode::Char('n') => self.open_new_issue(),
            KeyCode::Char('e') => self.open_edit_issue(),
            KeyCode::Char('x') | KeyCode::Delete => self.ask_delete(),
            KeyCode::Char('p') => {
                self.settings_form = Some(SettingsForm::from_settings(&self.settings));
                self.state = AppState::ProjectSettings;
            }
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn start_drag(&mut self) {
        let Some((column, task)) = self.selected_task() else {
            self.set_status_message("No card to pick up");
            return;
        };
        let payload = DragPayload::for_task(task.id, &column.id);
        let msg = format!(
            "Dragging #{}: arrows to choose a slot, Space/Enter to drop, Esc to cancel",
            task.id
        );
        self.set_status_message(msg);
        self.drag = Some(DragState {
            payload,
            source_column: self.selected_column,
            source_index: self.selected_card,
            hover_column: self.selected_column,
            hover_slot: self.selected_card,
        });
        self.show_task_detail = false;
        self.state = AppState::Dragging;
    }

    fn handle_drag_key(&mut self, key: KeyEvent) {
        let column_count = self.issues.columns().len();
        let Some(mut drag) = self.drag.take() else {
            self.state = AppState::Board;
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Board;
                self.set_status_message("Drag cancelled");
                return;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.state = AppState::Board;
                self.drop_card(&drag);
                return;
            }
            KeyCode::Left if drag.hover_column > 0 => {
                drag.hover_column -= 1;
                drag.hover_slot = drag.hover_slot.min(self.column_len(drag.hover_column));
            }
            KeyCode::Right if drag.hover_column + 1 < column_count => {
                drag.hover_column += 1;
                drag.hover_slot = drag.hover_slot.min(self.column_len(drag.hover_column));
            }
            KeyCode::Up if drag.hover_slot > 0 => drag.hover_slot -= 1,
            KeyCode::Down if drag.hover_slot < self.column_len(drag.hover_column) => {
                drag.hover_slot += 1
            }
            _ => {}
        }
        self.drag = Some(drag);
    }

    fn drop_card(&mut self, drag: &DragState) {
        let Some(target) = self.column_at(drag.hover_column) else {
            return;
        };
        let target_id = target.id.clone();
        // Slots count the dragged card itself when it stays in its column.
        let slot = if drag.hover_column == drag.source_column && drag.hover_slot > drag.source_index {
            drag.hover_slot - 1
        } else {
            drag.hover_slot
        };
        let position = i64::try_from(slot).unwrap_or(i64::MAX);
        match card_drop(&drag.payload, &target_id, position) {
            Some(request) => self.apply_move(&request),
            None => self.report(StoreError::MalformedInput(format!(
                "drag payload '{}'",
                drag.payload.task_id
            ))),
        }
    }

    /// Move the selected card to the end of the neighbouring column.
    fn throw_card(&mut self, forward: bool) {
        let Some((column, task)) = self.selected_task() else {
            return;
        };
        let target = if forward {
            self.selected_column + 1
        } else if self.selected_column > 0 {
            self.selected_column - 1
        } else {
            return;
        };
        let Some(target_column) = self.column_at(target) else {
            return;
        };
        let payload = DragPayload::for_task(task.id, &column.id);
        if let Some(request) = column_drop(&payload, &target_column.id, target_column.len()) {
            self.apply_move(&request);
        }
    }

    /// Swap the selected card with its neighbour above or below.
    fn nudge_card(&mut self, up: bool) {
        let Some((column, task)) = self.selected_task() else {
            return;
        };
        let len = column.len();
        let new_index = if up {
            if self.selected_card == 0 {
                return;
            }
            self.selected_card - 1
        } else {
            if self.selected_card + 1 >= len {
                return;
            }
            self.selected_card + 1
        };
        let request = MoveRequest {
            task_id: task.id,
            source_column_id: column.id.clone(),
            target_column_id: column.id.clone(),
            position: i64::try_from(new_index).unwrap_or(i64::MAX),
        };
        self.apply_move(&request);
    }

    fn open_new_issue(&mut self) {
        self.issue_form = Some(IssueForm::new(&self.column_titles()));
        self.editing_column = None;
        self.state = AppState::AddIssue;
    }

    fn open_edit_issue(&mut self) {
        let Some((column, task)) = self.selected_task() else {
            self.set_status_message("No card to edit");
            return;
        };
        let form = IssueForm::from_task(task, &self.column_titles());
        self.editing_column = Some(column.id.clone());
        self.issue_form = Some(form);
        self.show_task_detail = false;
        self.state = AppState::EditIssue;
    }

    fn close_issue_form(&mut self) {
        self.issue_form = None;
        self.editing_column = None;
        self.state = AppState::Board;
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.issue_form.as_mut() else {
            self.state = AppState::Board;
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.close_issue_form();
                self.set_status_message("Cancelled");
            }
            KeyCode::Enter => self.submit_issue_form(),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
    }

    fn submit_issue_form(&mut self) {
        let Some(form) = self.issue_form.as_ref() else {
            return;
        };
        let task = match form.to_task(self.issues.next_task_id()) {
            Ok(task) => task,
            Err(e) => {
                self.set_status_message(e.to_string());
                return;
            }
        };

        match (form.editing_id, self.editing_column.clone()) {
            (Some(id), Some(column_id)) => {
                let request = UpdateRequest {
                    id,
                    column_id,
                    updated_task: task,
                };
                match self.issues.try_update_task(request) {
                    Ok(_) => self.set_status_message(format!("Updated #{id}")),
                    Err(e) => self.report(e),
                }
            }
            _ => {
                let id = task.id;
                match self.issues.try_add_issue(task) {
                    Ok(index) => {
                        if let Some(column) = self
                            .issues
                            .columns()
                            .iter()
                            .position(|c| c.id == BACKLOG_COLUMN_ID)
                        {
                            self.select(column, index);
                        }
                        self.set_status_message(format!("Added #{id} to the backlog"));
                    }
                    Err(e) => self.report(e),
                }
            }
        }
        self.issue_form = None;
        self.editing_column = None;
        self.state = AppState::Board;
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        let Some(form) = self.settings_form.as_mut() else {
            self.state = AppState::Board;
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.settings_form = None;
                self.state = AppState::Board;
            }
            KeyCode::Enter => {
                form.submit(&mut self.settings);
                self.settings_form = None;
                self.state = AppState::Board;
                self.set_status_message("Project settings updated");
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.next_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
    }

    fn ask_delete(&mut self) {
        let Some((column, task)) = self.selected_task() else {
            return;
        };
        let pending = (task.id, column.id.clone());
        let msg = format!("Delete #{} \"{}\"? (y/n)", task.id, task.title);
        self.set_status_message(msg);
        self.pending_delete = Some(pending);
        self.show_task_detail = false;
        self.state = AppState::ConfirmDelete;
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some((task_id, column_id)) = self.pending_delete.take() {
                    match self.issues.try_delete_task(task_id, &column_id) {
                        Ok(_) => self.set_status_message(format!("Deleted #{task_id}")),
                        Err(e) => self.report(e),
                    }
                    self.clamp_selection();
                }
                self.state = AppState::Board;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.state = AppState::Board;
                self.set_status_message("Delete cancelled");
            }
            _ => {}
        }
    }

    /// Render the board and any open modal.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::AddIssue | AppState::EditIssue => self.render_issue_form(f),
            AppState::ProjectSettings => self.render_settings_form(f),
            AppState::ConfirmDelete => self.render_confirm(f),
            AppState::Help => self.render_help(f),
            AppState::Board if self.show_task_detail => self.render_task_detail_popup(f),
            _ => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header_text = vec![Line::from(vec![
            Span::styled(
                self.settings.project_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                self.settings.project_type().to_string(),
                Style::default().fg(ACCENT).add_modifier(Modifier::ITALIC),
            ),
            Span::raw(format!("  ·  {} issues", self.issues.task_count())),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL).title("Kanban Board"))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let column_count = self.issues.columns().len();
        if column_count == 0 {
            return;
        }
        if self.column_scroll_offsets.len() != column_count {
            self.column_scroll_offsets.resize(column_count, 0);
        }
        let constraints: Vec<Constraint> = (0..column_count)
            .map(|_| Constraint::Ratio(1, column_count as u32))
            .collect();

        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize) {
        let is_selected = column_index == self.selected_column;
        let hover_slot = self
            .drag
            .as_ref()
            .filter(|d| d.hover_column == column_index)
            .map(|d| d.hover_slot);
        let dragging_id = self.drag.as_ref().and_then(|d| d.payload.parse_task_id().ok());

        let Some(column) = self.issues.columns().get(column_index) else {
            return;
        };

        let border_style = if hover_slot.is_some() {
            Style::default().fg(DROP_MARKER).add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", column.title, column.len()))
            .border_style(border_style);

        let inner = block.inner(area);
        f.render_widget(block, area);

        let available_height = inner.height as usize;
        let visible_cards = (available_height / CARD_HEIGHT).max(1);

        // Keep the focused card (or drop slot) on screen.
        let focus = hover_slot.or(if is_selected { Some(self.selected_card) } else { None });
        let mut offset = self.column_scroll_offsets[column_index];
        if let Some(focus) = focus {
            if focus < offset {
                offset = focus;
            } else if focus >= offset + visible_cards {
                offset = focus + 1 - visible_cards;
            }
        }
        offset = offset.min(column.len().saturating_sub(1));
        self.column_scroll_offsets[column_index] = offset;

        let selected_card = self.selected_card;
        let mut current_y = 0usize;
        let mut rendered = 0usize;

        for (card_index, task) in column.tasks.iter().enumerate().skip(offset) {
            if hover_slot == Some(card_index) {
                render_drop_marker(f, inner, current_y);
                current_y += 1;
            }
            if current_y + CARD_HEIGHT > available_height {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + current_y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            let highlighted = (is_selected && self.drag.is_none() && card_index == selected_card)
                || dragging_id == Some(task.id);
            render_card(f, card_area, task, highlighted);
            current_y += CARD_HEIGHT;
            rendered += 1;
        }
        if hover_slot == Some(column.len()) && current_y < available_height {
            render_drop_marker(f, inner, current_y);
        }

        if offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", offset))
                .style(Style::default().fg(ACCENT));
            f.render_widget(indicator, Rect { x: inner.x, y: inner.y, width: inner.width, height: 1 });
        }
        let remaining = column.len().saturating_sub(offset + rendered);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining))
                .style(Style::default().fg(ACCENT));
            f.render_widget(
                indicator,
                Rect { x: inner.x, y: inner.y + inner.height - 1, width: inner.width, height: 1 },
            );
        }
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "←→↑↓: Select | Space: Drag | Ctrl+←→: Throw | Shift+↑↓: Reorder | n: New | e: Edit | x: Delete | p: Project | h: Help | q: Quit".to_string()
        };
        let bg = if self.state == AppState::Dragging { DROP_MARKER } else { ACCENT };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(bg).fg(Color::Black))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_task_detail_popup(&self, f: &mut Frame) {
        let Some((column, task)) = self.selected_task() else {
            return;
        };
        let popup_area = centered_rect(70, 70, f.area());
        f.render_widget(Clear, popup_area);

        let detail_lines = vec![
            Line::from(vec![Span::styled(
                format!("Issue #{}: {}", task.id, task.title),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(format!("Type:       {}", task.kind)),
            Line::from(format!("Priority:   {}", task.priority)),
            Line::from(format!("Status:     {}", task.status)),
            Line::from(format!("Column:     {}", column.title)),
            Line::from(format!("Reporter:   {}", task.reporter)),
            Line::from(format!("Assignees:  {}", format_assignees(&task.assignees))),
            Line::from(""),
            Line::from("Description:"),
            Line::from(task.description.as_deref().unwrap_or("-").to_string()),
        ];

        let popup = Paragraph::new(detail_lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Issue Details (Enter to close)")
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(priority_color(&task.priority))),
            )
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, popup_area);
    }

    fn render_issue_form(&self, f: &mut Frame) {
        let Some(form) = self.issue_form.as_ref() else {
            return;
        };
        let popup_area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, popup_area);

        let current = form.current_field;
        let lines = vec![
            text_line("Title", &form.title, current == TITLE_ORDER, "Issue title"),
            selector_line("Type", form.selected_kind(), current == TYPE_ORDER),
            selector_line("Priority", form.selected_priority(), current == PRIORITY_ORDER),
            selector_line("Status", form.selected_status(), current == STATUS_ORDER),
            text_line("Reporter", &form.reporter, current == REPORTER_ORDER, "Your name"),
            text_line("Assignees", &form.assignees, current == ASSIGNEES_ORDER, "Comma-separated names"),
            text_line("Description", &form.description, current == DESCRIPTION_ORDER, ""),
            Line::from(""),
            Line::from(Span::styled(
                "Tab/↑↓: Field | ←→: Cursor/Choice | Enter: Save | Esc: Cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let title = if form.is_edit() { "Edit Issue" } else { "Add New Issue" };
        let popup = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, popup_area);
    }

    fn render_settings_form(&self, f: &mut Frame) {
        let Some(form) = self.settings_form.as_ref() else {
            return;
        };
        let popup_area = centered_rect(50, 30, f.area());
        f.render_widget(Clear, popup_area);
        let lines = vec![
            text_line("Name", &form.name, form.name.active, ""),
            text_line("Type", &form.project_type, form.project_type.active, ""),
            Line::from(""),
            Line::from(Span::styled(
                "Tab: Field | Enter: Save | Esc: Cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let popup = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Project Settings")
                    .title_alignment(Alignment::Center),
            )
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, popup_area);
    }

    fn render_confirm(&self, f: &mut Frame) {
        let popup_area = centered_rect(40, 20, f.area());
        f.render_widget(Clear, popup_area);
        let popup = Paragraph::new(vec![
            Line::from(self.status_message.clone()),
            Line::from(""),
            Line::from("y: Delete | n: Keep"),
        ])
        .block(Block::default().borders(Borders::ALL).title("Confirm Action"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));
        f.render_widget(popup, popup_area);
    }

    fn render_help(&self, f: &mut Frame) {
        let popup_area = centered_rect(60, 70, f.area());
        f.render_widget(Clear, popup_area);
        let rows = [
            ("← → ↑ ↓", "Select column / card"),
            ("Enter", "Show issue details"),
            ("Space", "Pick up card, then Space/Enter to drop"),
            ("Ctrl+← →", "Move card to the neighbouring column"),
            ("Shift+↑ ↓ / K J", "Move card up or down in its column"),
            ("n", "New issue (lands in Backlog)"),
            ("e", "Edit selected issue"),
            ("x / Del", "Delete selected issue"),
            ("p", "Project settings"),
            ("q / Esc", "Quit"),
        ];
        let mut lines: Vec<Line> = rows
            .iter()
            .map(|(key, what)| {
                Line::from(vec![
                    Span::styled(format!("{:<18}", key), Style::default().fg(ACCENT)),
                    Span::raw(*what),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from("Press any key to close"));
        let popup = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup, popup_area);
    }

    /// Main event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) == KeyOutcome::Quit {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

fn render_card(f: &mut Frame, area: Rect, task: &Task, is_selected: bool) {
    let accent = priority_color(&task.priority);
    let style = if is_selected {
        Style::default()
            .bg(accent)
            .fg(priority_text_color(&task.priority))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let mut card_text = vec![Line::from(format!("#{} {} · {}", task.id, task.kind, task.priority))];
    let available_width = area.width.saturating_sub(2) as usize;
    for line in wrap_title(&task.title, available_width, 2) {
        card_text.push(Line::from(line));
    }
    card_text.push(Line::from(format!(
        "{} → {}",
        task.reporter,
        format_assignees(&task.assignees)
    )));

    let card = Paragraph::new(card_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent)),
        )
        .style(style);
    f.render_widget(card, area);
}

fn render_drop_marker(f: &mut Frame, inner: Rect, y: usize) {
    if y >= inner.height as usize {
        return;
    }
    let marker = Paragraph::new("▶ drop here")
        .style(Style::default().fg(Color::Black).bg(DROP_MARKER).add_modifier(Modifier::BOLD));
    f.render_widget(
        marker,
        Rect { x: inner.x, y: inner.y + y as u16, width: inner.width, height: 1 },
    );
}

fn text_line<'a>(label: &str, field: &InputField, active: bool, placeholder: &str) -> Line<'a> {
    let label_style = if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value = if active {
        Span::styled(field.display_with_cursor(), Style::default().add_modifier(Modifier::UNDERLINED))
    } else if field.value.is_empty() {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(field.value.clone())
    };
    Line::from(vec![Span::styled(format!("{:<12}", format!("{label}:")), label_style), value])
}

fn selector_line<'a>(label: &str, value: &str, active: bool) -> Line<'a> {
    let style = if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{:<12}", format!("{label}:")), style),
        Span::styled(format!("< {value} >"), style),
    ])
}

/// Word-wrap `title` into at most `max_lines` lines of `width` columns.
pub fn wrap_title(title: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    for word in title.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current_line));
            if lines.len() >= max_lines {
                return lines;
            }
            current_line = word.to_string();
        }
    }
    if !current_line.is_empty() && lines.len() < max_lines {
        lines.push(current_line);
    }
    lines
}

/// A rectangle of the given percentage size, centred in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn app() -> BoardApp {
        BoardApp::new(IssueStore::seeded(), SettingsStore::default())
    }

    fn ids(app: &BoardApp, column_id: &str) -> Vec<u64> {
        app.issues()
            .column(column_id)
            .map(|c| c.tasks.iter().map(|t| t.id).collect())
            .unwrap_or_default()
    }

    fn press(app: &mut BoardApp, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), KeyOutcome::Quit);
        assert_eq!(
            app.handle_key(with(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyOutcome::Quit
        );
    }

    #[test]
    fn test_navigation_clamps() {
        let mut app = app();
        app.handle_key(key(KeyCode::Left));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selection(), (0, 0));
        for _ in 0..10 {
            app.handle_key(key(KeyCode::Right));
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.selection(), (3, 1));
    }

    #[test]
    fn test_ctrl_right_throws_card_to_end_of_next_column() {
        let mut app = app();
        app.handle_key(with(KeyCode::Right, KeyModifiers::CONTROL));
        assert_eq!(ids(&app, "backlog"), vec![2]);
        assert_eq!(ids(&app, "todo"), vec![3, 4, 1]);
        assert_eq!(app.issues().find_task(1).unwrap().1.status, "To Do");
        assert_eq!(app.selection(), (1, 2));
        assert_eq!(app.status_message(), "Moved #1 to To Do");
    }

    #[test]
    fn test_ctrl_left_on_first_column_does_nothing() {
        let mut app = app();
        let before = app.issues().clone();
        app.handle_key(with(KeyCode::Left, KeyModifiers::CONTROL));
        assert_eq!(app.issues(), &before);
    }

    #[test]
    fn test_shift_down_reorders_within_column() {
        let mut app = app();
        app.handle_key(with(KeyCode::Down, KeyModifiers::SHIFT));
        assert_eq!(ids(&app, "backlog"), vec![2, 1]);
        assert_eq!(app.issues().find_task(1).unwrap().1.status, "Backlog");
        assert_eq!(app.selection(), (0, 1));

        // Already at the bottom.
        let before = app.issues().clone();
        app.handle_key(with(KeyCode::Down, KeyModifiers::SHIFT));
        assert_eq!(app.issues(), &before);
    }

    #[test]
    fn test_drag_and_drop_into_other_column() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.state(), AppState::Dragging);
        assert_eq!(app.drag().unwrap().payload, DragPayload::for_task(1, "backlog"));

        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.drag().unwrap().hover_column, 2);
        assert_eq!(app.drag().unwrap().hover_slot, 1);

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::Board);
        assert_eq!(ids(&app, "inprogress"), vec![5, 1, 6]);
        assert_eq!(app.issues().find_task(1).unwrap().1.status, "In Progress");
        assert_eq!(app.selection(), (2, 1));
    }

    #[test]
    fn test_drag_slot_stays_within_column_bounds() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char(' ')));
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Down));
        }
        assert_eq!(app.drag().unwrap().hover_slot, 2);
        app.handle_key(key(KeyCode::Char(' ')));
        // Dropped below the last card of its own column.
        assert_eq!(ids(&app, "backlog"), vec![2, 1]);
    }

    #[test]
    fn test_drop_in_place_keeps_order() {
        let mut app = app();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Down)); // slot just below itself
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(ids(&app, "backlog"), vec![1, 2]);
    }

    #[test]
    fn test_drag_cancel_leaves_board_unchanged() {
        let mut app = app();
        let before = app.issues().clone();
        app.handle_key(key(KeyCode::Char(' ')));
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state(), AppState::Board);
        assert!(app.drag().is_none());
        assert_eq!(app.issues(), &before);
    }

    #[test]
    fn test_add_issue_through_form() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.state(), AppState::AddIssue);

        // Submitting without required fields keeps the form open.
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::AddIssue);
        assert_eq!(app.status_message(), "Title is required");

        press(&mut app, "Test Issue");
        if let Some(form) = app.issue_form_mut() {
            form.current_field = REPORTER_ORDER;
            form.update_active_field();
        }
        press(&mut app, "Tester");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.state(), AppState::Board);
        assert_eq!(ids(&app, "backlog"), vec![1, 2, 9]);
        let (_, task) = app.issues().find_task(9).unwrap();
        assert_eq!(task.title, "Test Issue");
        assert_eq!(task.reporter, "Tester");
        assert_eq!(app.selection(), (0, 2));
    }

    #[test]
    fn test_new_issue_form_opens_empty_after_submit() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('n')));
        press(&mut app, "First");
        if let Some(form) = app.issue_form_mut() {
            form.current_field = REPORTER_ORDER;
            form.update_active_field();
        }
        press(&mut app, "Tester");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state(), AppState::Board);

        app.handle_key(key(KeyCode::Char('n')));
        let form = app.issue_form_mut().unwrap();
        assert!(form.title.value.is_empty());
        assert!(form.reporter.value.is_empty());
        assert_eq!(form.current_field, TITLE_ORDER);
        assert_eq!(form.selected_status(), "To Do");
    }

    #[test]
    fn test_form_escape_discards() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('n')));
        press(&mut app, "q");
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state(), AppState::Board);
        assert_eq!(app.issues().task_count(), 8);
    }

    #[test]
    fn test_edit_issue_replaces_task() {
        let mut app = app();
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.state(), AppState::EditIssue);
        app.handle_key(key(KeyCode::Backspace));
        press(&mut app, "E");
        app.handle_key(key(KeyCode::Enter));

        let backlog = app.issues().column("backlog").unwrap();
        assert_eq!(backlog.tasks[1].id, 2);
        assert_eq!(backlog.tasks[1].title, "Implement dark modE");
        assert_eq!(app.status_message(), "Updated #2");
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.state(), AppState::ConfirmDelete);
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(ids(&app, "backlog"), vec![1, 2]);

        app.handle_key(key(KeyCode::Delete));
        app.handle_key(key(KeyCode::Char('y')));
        assert_eq!(ids(&app, "backlog"), vec![2]);
        assert_eq!(app.status_message(), "Deleted #1");
        assert_eq!(app.selection(), (0, 0));
    }

    #[test]
    fn test_actions_on_empty_column_are_ignored() {
        let mut store = IssueStore::seeded();
        store.delete_task(1, "backlog");
        store.delete_task(2, "backlog");
        let mut app = BoardApp::new(store, SettingsStore::default());
        let before = app.issues().clone();

        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.state(), AppState::Board);
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.state(), AppState::Board);
        app.handle_key(with(KeyCode::Right, KeyModifiers::CONTROL));
        assert_eq!(app.issues(), &before);
    }

    #[test]
    fn test_project_settings_form() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('p')));
        assert_eq!(app.state(), AppState::ProjectSettings);
        press(&mut app, " 2");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.settings().project_name(), "Alpha Project 2");
        assert_eq!(app.settings().project_type(), "Software project");
        assert_eq!(app.state(), AppState::Board);
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.state(), AppState::Help);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), KeyOutcome::Continue);
        assert_eq!(app.state(), AppState::Board);
    }

    #[test]
    fn test_wrap_title() {
        assert_eq!(wrap_title("Fix login API issue", 10, 2), vec!["Fix login", "API issue"]);
        assert_eq!(wrap_title("one two three four", 7, 2), vec!["one two", "three"]);
        assert!(wrap_title("", 10, 2).is_empty());
    }

    #[test]
    fn test_render_smoke() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("Alpha Project"));
        assert!(screen.contains("Backlog (2)"));
        assert!(screen.contains("In Progress (2)"));

        app.handle_key(key(KeyCode::Char('n')));
        terminal.draw(|f| app.render(f)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("Add New Issue"));
    }
}
