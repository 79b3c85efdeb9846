//! Task record, drafts, and form validation.
//!
//! A `Task` is the persisted record; a `Draft` is the unsaved, user-edited
//! representation of one (from the TUI form or CLI flags) prior to
//! validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{Label, Priority, Status};
use crate::store::parse_due_input;

/// A single to-do item with status, priority, due date, and labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Opaque identity, assigned at creation and never reassigned.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due: NaiveDate,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An unsaved, user-edited representation of a task prior to validation.
///
/// The due date is held as the raw input string; it only becomes a
/// `NaiveDate` once validation accepts it.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due: String,
    pub labels: Vec<Label>,
}

/// Field-level validation errors for a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<&'static str>,
    pub due: Option<&'static str>,
}

impl FieldErrors {
    /// True when no field carries an error.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.due.is_none()
    }
}

impl Draft {
    /// Seed a draft from an existing task for editing.
    pub fn from_task(task: &Task) -> Self {
        Draft {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due: task.due.to_string(),
            labels: task.labels.clone(),
        }
    }

    /// Validate the draft, returning any field-level errors.
    ///
    /// Only the title and due date carry rules; status and priority always
    /// have defaults, and labels are constrained by the `Label` type.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.title.trim().is_empty() {
            errors.title = Some("Title is required");
        }
        if self.due.trim().is_empty() {
            errors.due = Some("Due date is required");
        } else if parse_due_input(&self.due).is_none() {
            errors.due = Some("Unrecognised due date");
        }
        errors
    }

    /// The resolved due date, if the raw input parses.
    pub fn due_date(&self) -> Option<NaiveDate> {
        parse_due_input(&self.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft(title: &str, due: &str) -> Draft {
        Draft {
            title: title.into(),
            due: due.into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_title_is_rejected() {
        let errors = draft("", "2024-01-01").validate();
        assert_eq!(errors.title, Some("Title is required"));
        assert_eq!(errors.due, None);
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let errors = draft("   ", "2024-01-01").validate();
        assert_eq!(errors.title, Some("Title is required"));
    }

    #[test]
    fn empty_due_is_rejected() {
        let errors = draft("Buy milk", "").validate();
        assert_eq!(errors.due, Some("Due date is required"));
        assert_eq!(errors.title, None);
    }

    #[test]
    fn malformed_due_is_rejected() {
        let errors = draft("Buy milk", "2024-13-99").validate();
        assert_eq!(errors.due, Some("Unrecognised due date"));
    }

    #[test]
    fn valid_draft_has_no_errors() {
        let errors = draft("Buy milk", "2024-01-01").validate();
        assert!(errors.is_empty());
    }

    #[test]
    fn both_fields_reported_together() {
        let errors = draft("", "").validate();
        assert_eq!(errors.title, Some("Title is required"));
        assert_eq!(errors.due, Some("Due date is required"));
        assert!(!errors.is_empty());
    }

    #[test]
    fn draft_defaults_match_new_task_defaults() {
        let d = Draft::default();
        assert_eq!(d.status, crate::fields::Status::NotStarted);
        assert_eq!(d.priority, crate::fields::Priority::Medium);
    }
}
