//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between the
//! task list, detail view, add/edit form, and dialogs. The header carries a
//! live clock and the dashboard counts, both recomputed from the one
//! in-memory collection.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::fields::{Label, Priority, SortKey, Status};
use crate::settings::Settings;
use crate::store::{format_due_relative, StatusCounts, StoreError, TaskStore};
use crate::tui::{
    colors::{priority_color, status_color, Theme, DARK_RED, INDIGO},
    enums::AppState,
    task_form::{
        TaskForm, DESCRIPTION_FIELD, DUE_FIELD, LABELS_FIELD, PRIORITY_FIELD, STATUS_FIELD,
        TITLE_FIELD,
    },
    utils::centered_rect,
};
use crate::view::{self, TaskQuery};

/// How long a transient status message stays on screen.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Main application state for the terminal user interface.
///
/// Owns the task store for the lifetime of the session; every view reads
/// from the same in-memory collection and every mutation goes through the
/// store's methods.
pub struct App {
    state: AppState,
    store: TaskStore,
    db_path: PathBuf,
    data_dir: PathBuf,
    settings: Settings,
    theme: Theme,
    task_list_state: TableState,
    /// Ids of the tasks currently visible, in projection order.
    visible_tasks: Vec<String>,
    selected_task: Option<String>,
    query: TaskQuery,
    search_active: bool,
    task_form: TaskForm,
    status_message: String,
    status_posted_at: Option<Instant>,
    confirm_action: Option<String>,
    counts: StatusCounts,
}

impl App {
    /// Create a new App instance, loading tasks and settings from disk.
    pub fn new(db_path: &Path, data_dir: &Path) -> Self {
        let store = TaskStore::load(db_path);
        let settings = Settings::load(data_dir);
        let theme = if settings.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        };
        let counts = store.counts();

        let mut app = App {
            state: AppState::TaskList,
            store,
            db_path: db_path.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
            settings,
            theme,
            task_list_state: TableState::default(),
            visible_tasks: Vec::new(),
            selected_task: None,
            query: TaskQuery::default(),
            search_active: false,
            task_form: TaskForm::new(),
            status_message: String::new(),
            status_posted_at: None,
            confirm_action: None,
            counts,
        };
        app.refresh_view();
        app
    }

    /// Recompute the dashboard counts and the visible projection after a
    /// mutation. Every consumer reads the same in-memory collection; nothing
    /// re-reads storage.
    fn on_tasks_changed(&mut self) {
        self.counts = self.store.counts();
        self.refresh_view();
    }

    /// Recompute the visible task ids from the current query, preserving the
    /// selection where possible.
    fn refresh_view(&mut self) {
        let old_selected = self
            .task_list_state
            .selected()
            .and_then(|idx| self.visible_tasks.get(idx))
            .cloned();

        self.visible_tasks = view::apply(&self.store.tasks, &self.query)
            .into_iter()
            .map(|t| t.id.clone())
            .collect();

        if let Some(old_id) = old_selected {
            if let Some(new_idx) = self.visible_tasks.iter().position(|id| *id == old_id) {
                self.task_list_state.select(Some(new_idx));
                return;
            }
        }
        if self.visible_tasks.is_empty() {
            self.task_list_state.select(None);
        } else {
            let out_of_range = self
                .task_list_state
                .selected()
                .map_or(true, |i| i >= self.visible_tasks.len());
            if out_of_range {
                self.task_list_state.select(Some(0));
            }
        }
    }

    /// Id of the task under the list cursor.
    fn selected_id(&self) -> Option<String> {
        self.task_list_state
            .selected()
            .and_then(|idx| self.visible_tasks.get(idx))
            .cloned()
    }

    /// Set a transient status message to display in the status bar.
    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
        self.status_posted_at = Some(Instant::now());
    }

    /// Clear the current status message.
    fn clear_status_message(&mut self) {
        self.status_message.clear();
        self.status_posted_at = None;
    }

    /// Drop the status message once it has been on screen long enough.
    fn expire_status_message(&mut self) {
        if let Some(at) = self.status_posted_at {
            if at.elapsed() >= STATUS_MESSAGE_TTL {
                self.clear_status_message();
            }
        }
    }

    /// Open the add form with fresh defaults.
    fn open_add_form(&mut self) {
        self.task_form = TaskForm::new();
        self.task_form.update_active_field();
        self.selected_task = None;
        self.state = AppState::AddTask;
    }

    /// Open the edit form populated from the given task.
    fn open_task_for_edit(&mut self, id: &str) {
        let Some(task) = self.store.get(id) else {
            return;
        };
        self.task_form = TaskForm::from_task(task);
        self.task_form.update_active_field();
        self.selected_task = Some(id.to_string());
        self.state = AppState::EditTask;
    }

    /// Flip the completion state of the task under the cursor.
    fn toggle_selected_status(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.store.toggle_status(&id) {
            Ok(status) => {
                self.on_tasks_changed();
                self.set_status_message(format!("Task marked as {}", status.display_name()));
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    /// Delete the task queued by the confirm dialog.
    fn delete_selected_task(&mut self) {
        let Some(id) = self.selected_task.clone() else {
            return;
        };
        match self.store.delete(&id) {
            Ok(true) => {
                self.on_tasks_changed();
                self.set_status_message("Task deleted successfully".to_string());
            }
            Ok(false) => self.set_status_message("Task was already gone".to_string()),
            Err(e) => self.set_status_message(format!("Error deleting task: {e}")),
        }
        self.selected_task = None;
    }

    /// Submit the form: validate, persist, and either close the form or keep
    /// it open with inline errors and the prior input retained.
    fn submit_form(&mut self, is_edit: bool) {
        let draft = self.task_form.to_draft();
        let result = if is_edit {
            match &self.selected_task {
                Some(id) => self
                    .store
                    .update(id, &draft)
                    .map(|_| "Task updated successfully"),
                None => return,
            }
        } else {
            self.store.create(&draft).map(|_| "Task added successfully")
        };

        match result {
            Ok(msg) => {
                self.on_tasks_changed();
                self.state = AppState::TaskList;
                self.set_status_message(msg.to_string());
            }
            Err(StoreError::Validation(errors)) => {
                self.task_form.errors = errors;
                self.set_status_message("Please fill all required fields".to_string());
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    /// Advance the status filter: All, Not Started, In Progress, Completed.
    fn cycle_status_filter(&mut self) {
        self.query.status = match self.query.status {
            None => Some(Status::NotStarted),
            Some(Status::NotStarted) => Some(Status::InProgress),
            Some(Status::InProgress) => Some(Status::Completed),
            Some(Status::Completed) => None,
        };
        self.refresh_view();
        let name = self.query.status.map_or("All", |s| s.display_name());
        self.set_status_message(format!("Status filter: {name}"));
    }

    /// Advance the priority filter: All, Low, Medium, High, Urgent.
    fn cycle_priority_filter(&mut self) {
        self.query.priority = match self.query.priority {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::High),
            Some(Priority::High) => Some(Priority::Urgent),
            Some(Priority::Urgent) => None,
        };
        self.refresh_view();
        let name = self.query.priority.map_or("All", |p| p.display_name());
        self.set_status_message(format!("Priority filter: {name}"));
    }

    /// Advance the label filter through the vocabulary and back to All.
    fn cycle_label_filter(&mut self) {
        self.query.label = match self.query.label {
            None => Some(Label::ALL[0]),
            Some(l) => {
                let idx = Label::ALL.iter().position(|&x| x == l).unwrap_or(0);
                if idx + 1 < Label::ALL.len() {
                    Some(Label::ALL[idx + 1])
                } else {
                    None
                }
            }
        };
        self.refresh_view();
        let name = self.query.label.map_or("All", |l| l.display_name());
        self.set_status_message(format!("Label filter: {name}"));
    }

    /// Advance the sort key.
    fn cycle_sort(&mut self) {
        self.query.sort = match self.query.sort {
            SortKey::Newest => SortKey::Oldest,
            SortKey::Oldest => SortKey::DueDate,
            SortKey::DueDate => SortKey::Priority,
            SortKey::Priority => SortKey::Newest,
        };
        self.refresh_view();
        self.set_status_message(format!("Sorted by {}", self.query.sort.display_name()));
    }

    /// Flip between the dark and light colour schemes and persist the
    /// preference.
    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.settings.dark_mode = self.theme == Theme::Dark;
        if let Err(e) = self.settings.save(&self.data_dir) {
            self.set_status_message(format!("Error saving settings: {e}"));
        } else {
            self.set_status_message(
                match self.theme {
                    Theme::Dark => "Dark mode on",
                    Theme::Light => "Light mode on",
                }
                .to_string(),
            );
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.search_active {
            match key {
                KeyCode::Esc => {
                    self.search_active = false;
                    self.query.search.clear();
                    self.refresh_view();
                    self.clear_status_message();
                }
                KeyCode::Enter => {
                    self.search_active = false;
                    if self.query.search.is_empty() {
                        self.set_status_message("Search cleared".to_string());
                    } else {
                        self.set_status_message(format!(
                            "Search applied: '{}' ({} tasks)",
                            self.query.search,
                            self.visible_tasks.len()
                        ));
                    }
                }
                KeyCode::Backspace => {
                    self.query.search.pop();
                    self.refresh_view();
                }
                KeyCode::Char(c) => {
                    self.query.search.push(c);
                    self.refresh_view();
                }
                _ => {}
            }
            return false;
        }

        match key {
            KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Esc => {
                if self.query.is_filtering() {
                    self.query = TaskQuery {
                        sort: self.query.sort,
                        ..Default::default()
                    };
                    self.refresh_view();
                    self.set_status_message("Filters cleared".to_string());
                } else {
                    return true;
                }
            }
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected > 0 {
                        self.task_list_state.select(Some(selected - 1));
                    }
                } else if !self.visible_tasks.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.visible_tasks.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                } else if !self.visible_tasks.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.selected_task = Some(id);
                    self.state = AppState::TaskDetail;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('c') => self.toggle_selected_status(),
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    self.open_task_for_edit(&id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.confirm_action = Some(format!("Delete task {id}"));
                    self.selected_task = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('/') => {
                self.search_active = true;
                self.set_status_message(
                    "Search mode: type to match title/description, Enter to apply, Esc to cancel"
                        .to_string(),
                );
            }
            KeyCode::Char('s') => self.cycle_status_filter(),
            KeyCode::Char('p') => self.cycle_priority_filter(),
            KeyCode::Char('l') => self.cycle_label_filter(),
            KeyCode::Char('o') => self.cycle_sort(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('h') => self.state = AppState::Help,
            KeyCode::Char('r') => {
                self.store = TaskStore::load(&self.db_path);
                self.on_tasks_changed();
                self.set_status_message("Tasks reloaded".to_string());
            }
            _ => {}
        }
        false
    }

    /// Handle keyboard input when viewing task details.
    fn handle_detail_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.state = AppState::TaskList;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_task.clone() {
                    self.open_task_for_edit(&id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_task.clone() {
                    self.confirm_action = Some(format!("Delete task {id}"));
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('c') | KeyCode::Char(' ') => {
                if let Some(id) = self.selected_task.clone() {
                    match self.store.toggle_status(&id) {
                        Ok(status) => {
                            self.on_tasks_changed();
                            self.set_status_message(format!(
                                "Task marked as {}",
                                status.display_name()
                            ));
                        }
                        Err(e) => self.set_status_message(format!("Error: {e}")),
                    }
                }
            }
            _ => {}
        }
    }

    /// Handle keyboard input when in the add or edit form.
    fn handle_form_input(&mut self, key: KeyCode, is_edit: bool) {
        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Char(' ') if self.task_form.current_field == LABELS_FIELD => {
                self.task_form.toggle_label();
            }
            KeyCode::Enter => self.submit_form(is_edit),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    /// Handle keyboard input in the confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if self.confirm_action.is_some() {
                    self.delete_selected_task();
                }
                self.state = AppState::TaskList;
                self.confirm_action = None;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.confirm_action = None;
            }
            _ => {}
        }
    }

    /// Poll for input, dispatching on the current view.
    ///
    /// The short poll timeout doubles as the clock tick: the header redraws
    /// on every pass whether or not a key arrived.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                self.clear_status_message();

                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
                    AppState::TaskDetail => {
                        self.handle_detail_input(key.code);
                        false
                    }
                    AppState::AddTask => {
                        self.handle_form_input(key.code, false);
                        false
                    }
                    AppState::EditTask => {
                        self.handle_form_input(key.code, true);
                        false
                    }
                    AppState::Help => {
                        if matches!(
                            key.code,
                            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h')
                        ) {
                            self.state = AppState::TaskList;
                        }
                        false
                    }
                    AppState::Confirm => {
                        self.handle_confirm_input(key.code);
                        false
                    }
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Render the header: app title, live clock, and counts by status.
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let clock = Local::now().format("%-I:%M:%S %p").to_string();
        let line = Line::from(vec![
            Span::styled(
                "Task",
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Flow",
                Style::default().fg(INDIGO).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(clock, Style::default().fg(self.theme.muted())),
            Span::raw("  |  "),
            Span::styled(
                format!("Total {}", self.counts.total),
                Style::default().fg(self.theme.text()),
            ),
            Span::raw("  "),
            Span::styled(
                format!("Completed {}", self.counts.completed),
                Style::default().fg(status_color(Status::Completed)),
            ),
            Span::raw("  "),
            Span::styled(
                format!("In Progress {}", self.counts.in_progress),
                Style::default().fg(status_color(Status::InProgress)),
            ),
            Span::raw("  "),
            Span::styled(
                format!("Not Started {}", self.counts.not_started),
                Style::default().fg(status_color(Status::NotStarted)),
            ),
        ]);
        let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    /// Render the main task list view.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let mut title = format!(
            "Tasks ({}/{})",
            self.visible_tasks.len(),
            self.store.tasks.len()
        );
        if let Some(s) = self.query.status {
            title.push_str(&format!(" | {}", s.display_name()));
        }
        if let Some(p) = self.query.priority {
            title.push_str(&format!(" | {} Priority", p.display_name()));
        }
        if let Some(l) = self.query.label {
            title.push_str(&format!(" | Label: {}", l.display_name()));
        }
        title.push_str(&format!(" | Sort: {}", self.query.sort.display_name()));

        if self.visible_tasks.is_empty() {
            let hint = if self.store.tasks.is_empty() {
                "No tasks yet. Press 'a' to create your first task."
            } else {
                "No tasks match the current filters. Esc clears filters."
            };
            let empty = Paragraph::new(hint)
                .style(Style::default().fg(self.theme.muted()))
                .block(Block::default().borders(Borders::ALL).title(title))
                .alignment(Alignment::Center);
            f.render_widget(empty, area);
            return;
        }

        let today = Local::now().date_naive();
        let rows: Vec<Row> = self
            .visible_tasks
            .iter()
            .filter_map(|id| self.store.get(id))
            .map(|t| {
                let title_style = if t.status == Status::Completed {
                    Style::default()
                        .fg(self.theme.muted())
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(self.theme.text())
                };
                let labels = t
                    .labels
                    .iter()
                    .map(|l| l.display_name())
                    .collect::<Vec<_>>()
                    .join(",");
                Row::new(vec![
                    Cell::from(t.status.marker())
                        .style(Style::default().fg(status_color(t.status))),
                    Cell::from(t.title.clone()).style(title_style),
                    Cell::from(t.priority.display_name())
                        .style(Style::default().fg(priority_color(t.priority))),
                    Cell::from(format_due_relative(t.due, today)),
                    Cell::from(labels).style(Style::default().fg(self.theme.muted())),
                ])
            })
            .collect();

        let header = Row::new(vec!["", "Title", "Priority", "Due", "Labels"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let widths = [
            Constraint::Length(3),
            Constraint::Min(24),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(28),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(
                Style::default()
                    .bg(self.theme.highlight_bg())
                    .fg(self.theme.highlight_fg()),
            )
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    /// Render the detailed view of a single task.
    fn render_task_detail(&self, f: &mut Frame, area: Rect) {
        let Some(task) = self
            .selected_task
            .as_ref()
            .and_then(|id| self.store.get(id))
        else {
            return;
        };
        let today = Local::now().date_naive();
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(vec![Span::styled("ID: ", bold), Span::raw(task.id.clone())]),
            Line::from(vec![
                Span::styled("Title: ", bold),
                Span::raw(task.title.clone()),
            ]),
            Line::from(vec![
                Span::styled("Status: ", bold),
                Span::styled(
                    task.status.display_name(),
                    Style::default().fg(status_color(task.status)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Priority: ", bold),
                Span::styled(
                    task.priority.display_name(),
                    Style::default().fg(priority_color(task.priority)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Due: ", bold),
                Span::raw(format!(
                    "{} ({})",
                    task.due,
                    format_due_relative(task.due, today)
                )),
            ]),
            Line::from(vec![
                Span::styled("Labels: ", bold),
                Span::raw(if task.labels.is_empty() {
                    "-".to_string()
                } else {
                    task.labels
                        .iter()
                        .map(|l| l.display_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                }),
            ]),
            Line::from(vec![
                Span::styled("Created: ", bold),
                Span::raw(
                    task.created_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                ),
            ]),
            Line::from(vec![
                Span::styled("Updated: ", bold),
                Span::raw(
                    task.updated_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                ),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled("Description:", bold)]),
        ];
        if task.description.is_empty() {
            text.push(Line::from("-"));
        } else {
            text.push(Line::from(task.description.clone()));
        }

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Task Details - [e]dit, [d]elete, [c] toggle, [Esc] back"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Border style for a form field.
    fn field_border(&self, active: bool, error: bool) -> Style {
        if error {
            Style::default().fg(Color::Red)
        } else if active {
            Style::default().fg(INDIGO)
        } else {
            Style::default().fg(self.theme.muted())
        }
    }

    /// Render the task creation or editing form.
    fn render_task_form(&self, f: &mut Frame, area: Rect, is_edit: bool) {
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(if is_edit { "Edit Task" } else { "Add New Task" });
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(4), // Description
                Constraint::Length(3), // Due date
                Constraint::Length(3), // Status
                Constraint::Length(3), // Priority
                Constraint::Length(3), // Labels
                Constraint::Min(1),    // Key hints
            ])
            .split(inner);

        let form = &self.task_form;
        let errors = &form.errors;

        let title_label = match errors.title {
            Some(msg) => format!("Title * ({msg})"),
            None => "Title *".to_string(),
        };
        let title_input = Paragraph::new(form.title.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title_label)
                .border_style(
                    self.field_border(form.current_field == TITLE_FIELD, errors.title.is_some()),
                ),
        );
        f.render_widget(title_input, chunks[0]);

        let desc_input = Paragraph::new(form.description.value.as_str())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Description")
                    .border_style(
                        self.field_border(form.current_field == DESCRIPTION_FIELD, false),
                    ),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(desc_input, chunks[1]);

        let due_label = match errors.due {
            Some(msg) => format!("Due * ({msg})"),
            None => "Due * (YYYY-MM-DD, today, tomorrow, in Nd)".to_string(),
        };
        let due_input = Paragraph::new(form.due.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(due_label)
                .border_style(
                    self.field_border(form.current_field == DUE_FIELD, errors.due.is_some()),
                ),
        );
        f.render_widget(due_input, chunks[2]);

        let status = form.statuses[form.status];
        let status_selector = Paragraph::new(Line::from(Span::styled(
            format!("< {} >", status.display_name()),
            Style::default().fg(status_color(status)),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status")
                .border_style(self.field_border(form.current_field == STATUS_FIELD, false)),
        );
        f.render_widget(status_selector, chunks[3]);

        let priority = form.priorities[form.priority];
        let priority_selector = Paragraph::new(Line::from(Span::styled(
            format!("< {} >", priority.display_name()),
            Style::default().fg(priority_color(priority)),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(self.field_border(form.current_field == PRIORITY_FIELD, false)),
        );
        f.render_widget(priority_selector, chunks[4]);

        let mut spans = Vec::new();
        for (i, label) in Label::ALL.iter().enumerate() {
            let selected = form.labels.contains(label);
            let mut style = if selected {
                Style::default().fg(Color::Black).bg(INDIGO)
            } else {
                Style::default().fg(self.theme.text())
            };
            if form.current_field == LABELS_FIELD && i == form.label_cursor {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            spans.push(Span::styled(format!(" {} ", label.display_name()), style));
            spans.push(Span::raw(" "));
        }
        let labels_row = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Labels (Space toggles)")
                .border_style(self.field_border(form.current_field == LABELS_FIELD, false)),
        );
        f.render_widget(labels_row, chunks[5]);

        let hints = Paragraph::new("Tab/Up/Down move | Left/Right edit or cycle | Enter save | Esc cancel")
            .style(Style::default().fg(self.theme.muted()));
        f.render_widget(hints, chunks[6]);
    }

    /// Render the help overlay.
    fn render_help(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from("Task list"),
            Line::from("  Up/Down        move selection"),
            Line::from("  Enter          view task details"),
            Line::from("  a              add a task"),
            Line::from("  e              edit the selected task"),
            Line::from("  d              delete the selected task (confirms)"),
            Line::from("  Space / c      toggle complete"),
            Line::from("  /              search title and description"),
            Line::from("  s              cycle status filter"),
            Line::from("  p              cycle priority filter"),
            Line::from("  l              cycle label filter"),
            Line::from("  o              cycle sort order"),
            Line::from("  t              toggle dark/light theme"),
            Line::from("  r              reload tasks from disk"),
            Line::from("  Esc            clear filters, or quit"),
            Line::from("  q / Ctrl+C     quit"),
            Line::from(""),
            Line::from("Press Esc, q, or h to close this help."),
        ];
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        f.render_widget(help, area);
    }

    /// Render the delete confirmation dialog over the task list.
    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(self.confirm_action.clone().unwrap_or_default()),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.search_active {
            format!(
                "Search: {} (Esc to clear, Enter to apply)",
                self.query.search
            )
        } else if self.query.is_filtering() {
            format!(
                "Tasks: {} (filtered) | Press 'h' for help",
                self.visible_tasks.len()
            )
        } else {
            match self.state {
                AppState::TaskList => {
                    format!("Tasks: {} | Press 'h' for help", self.visible_tasks.len())
                }
                AppState::TaskDetail => "Task Details".to_string(),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => "Confirm Action".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(INDIGO).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the appropriate view.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[1]),
            AppState::TaskDetail => self.render_task_detail(f, chunks[1]),
            AppState::AddTask => self.render_task_form(f, chunks[1], false),
            AppState::EditTask => self.render_task_form(f, chunks[1], true),
            AppState::Help => self.render_help(f, chunks[1]),
            AppState::Confirm => {
                self.render_task_list(f, chunks[1]);
                self.render_confirm(f, chunks[1]);
            }
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.expire_status_message();
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
