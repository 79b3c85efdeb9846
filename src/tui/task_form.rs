//! Task form state for the add/edit views.
//!
//! The form mirrors the draft record: free-text inputs for title,
//! description, and due date, selectors for status and priority, and a
//! multi-toggle over the label vocabulary. Validation errors are held on the
//! form so they can be rendered inline next to the offending field.

use crate::fields::{Label, Priority, Status};
use crate::task::{Draft, FieldErrors, Task};
use crate::tui::input::InputField;

/// Field order within the form.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const DUE_FIELD: usize = 2;
pub const STATUS_FIELD: usize = 3;
pub const PRIORITY_FIELD: usize = 4;
pub const LABELS_FIELD: usize = 5;
pub const FIELD_COUNT: usize = 6;

/// Form state for creating and editing tasks.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub status: usize,
    pub priority: usize,
    pub labels: Vec<Label>,
    pub label_cursor: usize,
    pub current_field: usize,
    pub errors: FieldErrors,
    pub statuses: Vec<Status>,
    pub priorities: Vec<Priority>,
}

impl TaskForm {
    /// Create an empty form with the record defaults: Not Started, Medium
    /// priority, due today.
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::with_value(&chrono::Local::now().date_naive().to_string()),
            status: 0,   // Not Started
            priority: 1, // Medium
            labels: Vec::new(),
            label_cursor: 0,
            current_field: 0,
            errors: FieldErrors::default(),
            statuses: vec![Status::NotStarted, Status::InProgress, Status::Completed],
            priorities: vec![
                Priority::Low,
                Priority::Medium,
                Priority::High,
                Priority::Urgent,
            ],
        }
    }

    /// Create a form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new();
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.due = InputField::with_value(&task.due.to_string());
        form.status = form
            .statuses
            .iter()
            .position(|&s| s == task.status)
            .unwrap_or(0);
        form.priority = form
            .priorities
            .iter()
            .position(|&p| p == task.priority)
            .unwrap_or(1);
        form.labels = task.labels.clone();
        form
    }

    /// Build a draft from the current form contents.
    pub fn to_draft(&self) -> Draft {
        Draft {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            status: self.statuses[self.status],
            priority: self.priorities[self.priority],
            due: self.due.value.clone(),
            labels: self.labels.clone(),
        }
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which field is currently active for editing.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
        self.due.active = self.current_field == DUE_FIELD;
    }

    /// Handle character input for the currently active field.
    ///
    /// Typing into a field clears any validation error it carries, so the
    /// error disappears as soon as the user starts fixing it.
    pub fn handle_char(&mut self, c: char) {
        match self.current_field {
            TITLE_FIELD => {
                self.title.handle_char(c);
                self.errors.title = None;
            }
            DESCRIPTION_FIELD => self.description.handle_char(c),
            DUE_FIELD => {
                self.due.handle_char(c);
                self.errors.due = None;
            }
            _ => {}
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        match self.current_field {
            TITLE_FIELD => {
                self.title.handle_backspace();
                self.errors.title = None;
            }
            DESCRIPTION_FIELD => self.description.handle_backspace(),
            DUE_FIELD => {
                self.due.handle_backspace();
                self.errors.due = None;
            }
            _ => {}
        }
    }

    /// Handle delete input for the currently active field.
    pub fn handle_delete(&mut self) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_delete(),
            DESCRIPTION_FIELD => self.description.handle_delete(),
            DUE_FIELD => self.due.handle_delete(),
            _ => {}
        }
    }

    /// Handle left/right arrow keys: cursor movement in text fields,
    /// selector changes otherwise.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            TITLE_FIELD => {
                if right {
                    self.title.move_cursor_right()
                } else {
                    self.title.move_cursor_left()
                }
            }
            DESCRIPTION_FIELD => {
                if right {
                    self.description.move_cursor_right()
                } else {
                    self.description.move_cursor_left()
                }
            }
            DUE_FIELD => {
                if right {
                    self.due.move_cursor_right()
                } else {
                    self.due.move_cursor_left()
                }
            }
            STATUS_FIELD => {
                self.status = cycle(self.status, self.statuses.len(), right);
            }
            PRIORITY_FIELD => {
                self.priority = cycle(self.priority, self.priorities.len(), right);
            }
            LABELS_FIELD => {
                self.label_cursor = cycle(self.label_cursor, Label::ALL.len(), right);
            }
            _ => {}
        }
    }

    /// Toggle membership of the label under the cursor.
    pub fn toggle_label(&mut self) {
        let label = Label::ALL[self.label_cursor];
        if let Some(pos) = self.labels.iter().position(|&l| l == label) {
            self.labels.remove(pos);
        } else {
            self.labels.push(label);
        }
    }
}

fn cycle(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_label_is_an_involution() {
        let mut form = TaskForm::new();
        form.current_field = LABELS_FIELD;
        form.toggle_label();
        assert_eq!(form.labels, vec![Label::Work]);
        form.toggle_label();
        assert!(form.labels.is_empty());
    }

    #[test]
    fn form_round_trips_through_a_task() {
        let mut form = TaskForm::new();
        for c in "Buy milk".chars() {
            form.handle_char(c);
        }
        form.current_field = PRIORITY_FIELD;
        form.handle_left_right(true); // Medium -> High
        form.current_field = LABELS_FIELD;
        form.toggle_label();

        let draft = form.to_draft();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.labels, vec![Label::Work]);
    }

    #[test]
    fn typing_clears_the_field_error() {
        let mut form = TaskForm::new();
        form.errors = FieldErrors {
            title: Some("Title is required"),
            due: None,
        };
        form.handle_char('B');
        assert_eq!(form.errors.title, None);
    }
}
