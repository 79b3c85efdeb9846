//! Task storage and mutation operations.
//!
//! This module provides the `TaskStore`, the single owner of the task
//! collection. The collection is loaded once at startup, held in memory, and
//! every mutation validates, applies, and then rewrites the backing JSON
//! file in full. It also carries the date parsing and formatting helpers
//! shared by the CLI and the TUI.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate, Utc};
use thiserror::Error;

use crate::fields::Status;
use crate::task::{Draft, FieldErrors, Task};

/// Errors produced by store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// File-backed store owning the task collection.
#[derive(Debug)]
pub struct TaskStore {
    pub tasks: Vec<Task>,
    path: PathBuf,
}

impl TaskStore {
    /// Load the store from a JSON file, starting empty when the file is
    /// missing, unreadable, or unparseable.
    pub fn load(path: &Path) -> Self {
        let mut store = TaskStore {
            tasks: Vec::new(),
            path: path.to_path_buf(),
        };
        if !path.exists() {
            return store;
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(tasks) => store.tasks = tasks,
                Err(e) => eprintln!("Error parsing task file, starting fresh: {e}"),
            },
            Err(e) => eprintln!("Error reading task file, starting fresh: {e}"),
        }
        store
    }

    /// Write the whole collection to disk using atomic write (temp file +
    /// rename). Prior content is fully overwritten.
    pub fn save(&self) -> std::io::Result<()> {
        // Atomic-ish write via temp + rename.
        let tmp = self.path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(&self.tasks)
            .map_err(std::io::Error::other)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }

    /// Get a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Mint a fresh id from the current time in milliseconds, bumping past
    /// any collision so ids stay unique within the collection.
    fn mint_id(&self) -> String {
        let mut stamp = Utc::now().timestamp_millis();
        loop {
            let id = stamp.to_string();
            if !self.tasks.iter().any(|t| t.id == id) {
                return id;
            }
            stamp += 1;
        }
    }

    /// Validate a draft and append it as a new task, then persist.
    ///
    /// On validation failure nothing is written and the collection is
    /// untouched.
    pub fn create(&mut self, draft: &Draft) -> Result<&Task, StoreError> {
        let errors = draft.validate();
        let due = match draft.due_date() {
            Some(d) => d,
            None => return Err(StoreError::Validation(errors)),
        };
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }

        let now = Utc::now();
        let task = Task {
            id: self.mint_id(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            status: draft.status,
            priority: draft.priority,
            due,
            labels: draft.labels.clone(),
            created_at: now,
            updated_at: now,
        };

        let idx = self.tasks.len();
        self.tasks.push(task);
        self.save()?;
        Ok(&self.tasks[idx])
    }

    /// Validate a draft and replace the fields of the task matching `id`,
    /// refreshing its update timestamp. The id and creation timestamp are
    /// untouched.
    pub fn update(&mut self, id: &str, draft: &Draft) -> Result<(), StoreError> {
        let errors = draft.validate();
        let due = match draft.due_date() {
            Some(d) => d,
            None => return Err(StoreError::Validation(errors)),
        };
        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }

        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        {
            let t = &mut self.tasks[idx];
            t.title = draft.title.trim().to_string();
            t.description = draft.description.trim().to_string();
            t.status = draft.status;
            t.priority = draft.priority;
            t.due = due;
            t.labels = draft.labels.clone();
            t.updated_at = Utc::now();
        }
        self.save()?;
        Ok(())
    }

    /// Remove the task matching `id`. Removal is idempotent: an absent id
    /// leaves the collection unchanged, skips the write, and returns false
    /// so callers can decide what to report.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Flip the completion state of a task: Completed goes back to Not
    /// Started, anything else becomes Completed. Returns the new status.
    pub fn toggle_status(&mut self, id: &str) -> Result<Status, StoreError> {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        let new_status = match self.tasks[idx].status {
            Status::Completed => Status::NotStarted,
            Status::NotStarted | Status::InProgress => Status::Completed,
        };
        self.tasks[idx].status = new_status;
        self.tasks[idx].updated_at = Utc::now();
        self.save()?;
        Ok(new_status)
    }

    /// Aggregate counts by status, for the dashboard.
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::of(&self.tasks)
    }
}

/// Task counts partitioned by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
}

impl StatusCounts {
    /// Count a collection by status.
    pub fn of(tasks: &[Task]) -> Self {
        let mut counts = StatusCounts {
            total: tasks.len(),
            ..Default::default()
        };
        for t in tasks {
            match t.status {
                Status::Completed => counts.completed += 1,
                Status::InProgress => counts.in_progress += 1,
                Status::NotStarted => counts.not_started += 1,
            }
        }
        counts
    }
}

/// Parse a due date from user input.
///
/// Accepts "today", "tomorrow", "in Nd", "in Nw", and plain `YYYY-MM-DD`.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d",
/// "2d late").
pub fn format_due_relative(due: NaiveDate, today: NaiveDate) -> String {
    let days = (due - today).num_days();
    match days {
        0 => "today".into(),
        1 => "tomorrow".into(),
        d if d > 1 => format!("in {d}d"),
        d => format!("{}d late", -d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Label, Priority};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn draft(title: &str, due: &str) -> Draft {
        Draft {
            title: title.into(),
            due: due.into(),
            ..Default::default()
        }
    }

    fn store_in(dir: &TempDir) -> TaskStore {
        TaskStore::load(&dir.path().join("tasks.json"))
    }

    #[test]
    fn create_valid_task_applies_defaults() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let task = store.create(&draft("Buy milk", "2024-01-01")).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.status, Status::NotStarted);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.due, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(store.tasks.len(), 1);
    }

    #[test]
    fn create_with_empty_title_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        let mut store = TaskStore::load(&path);

        let err = store.create(&draft("", "2024-01-01")).unwrap_err();
        match err {
            StoreError::Validation(errors) => {
                assert_eq!(errors.title, Some("Title is required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(store.tasks.is_empty());
        // Rejected mutations must not touch the file.
        assert!(!path.exists());
    }

    #[test]
    fn create_trims_title_and_description() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let task = store
            .create(&Draft {
                title: "  Buy milk  ".into(),
                description: "  two litres  ".into(),
                due: "2024-01-01".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "two litres");
    }

    #[test]
    fn minted_ids_are_unique() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let a = store.create(&draft("First", "today")).unwrap().id.clone();
        let b = store.create(&draft("Second", "today")).unwrap().id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn update_refreshes_timestamp_and_keeps_identity() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let (id, created_at) = {
            let task = store.create(&draft("Buy milk", "2024-01-01")).unwrap();
            (task.id.clone(), task.created_at)
        };

        let mut edited = draft("Buy oat milk", "2024-02-01");
        edited.labels = vec![Label::Health];
        store.update(&id, &edited).unwrap();

        let task = store.get(&id).unwrap();
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.labels, vec![Label::Health]);
        assert_eq!(task.created_at, created_at);
        assert_eq!(task.id, id);
        assert!(task.updated_at >= task.created_at);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let err = store.update("nope", &draft("Title", "today")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn update_with_invalid_draft_is_rejected_before_lookup() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let id = store.create(&draft("Buy milk", "today")).unwrap().id.clone();
        let err = store.update(&id, &draft("", "today")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.get(&id).unwrap().title, "Buy milk");
    }

    #[test]
    fn toggle_status_is_an_involution() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let id = store.create(&draft("Buy milk", "today")).unwrap().id.clone();
        assert_eq!(store.toggle_status(&id).unwrap(), Status::Completed);
        assert_eq!(store.toggle_status(&id).unwrap(), Status::NotStarted);
    }

    #[test]
    fn toggle_in_progress_task_completes_it() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let mut d = draft("Write report", "today");
        d.status = Status::InProgress;
        let id = store.create(&d).unwrap().id.clone();
        assert_eq!(store.toggle_status(&id).unwrap(), Status::Completed);
    }

    #[test]
    fn toggle_missing_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        assert!(matches!(
            store.toggle_status("nope"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn delete_removes_exactly_the_matching_task() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let keep = store.create(&draft("Keep", "today")).unwrap().id.clone();
        let gone = store.create(&draft("Gone", "today")).unwrap().id.clone();

        assert!(store.delete(&gone).unwrap());
        assert_eq!(store.tasks.len(), 1);
        assert!(store.get(&keep).is_some());
        assert!(store.get(&gone).is_none());
    }

    #[test]
    fn delete_of_absent_id_reports_false() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.create(&draft("Keep", "today")).unwrap();
        assert!(!store.delete("nope").unwrap());
        assert_eq!(store.tasks.len(), 1);
    }

    #[test]
    fn save_load_round_trip_preserves_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = TaskStore::load(&path);
        let mut d = draft("Buy milk", "2024-01-01");
        d.labels = vec![Label::Personal, Label::Finance];
        d.priority = Priority::High;
        store.create(&d).unwrap();
        store.create(&draft("Write report", "2024-02-01")).unwrap();

        let reloaded = TaskStore::load(&path);
        assert_eq!(reloaded.tasks, store.tasks);
    }

    #[test]
    fn malformed_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = TaskStore::load(&path);
        assert!(store.tasks.is_empty());
    }

    #[test]
    fn counts_partition_the_collection() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.create(&draft("a", "today")).unwrap();
        let mut d = draft("b", "today");
        d.status = Status::InProgress;
        store.create(&d).unwrap();
        let id = store.create(&draft("c", "today")).unwrap().id.clone();
        store.toggle_status(&id).unwrap();

        let counts = store.counts();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.not_started, 1);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.completed, 1);
        assert_eq!(
            counts.total,
            counts.not_started + counts.in_progress + counts.completed
        );
    }

    #[test]
    fn parse_due_input_accepts_natural_forms() {
        let today = Local::now().date_naive();
        assert_eq!(parse_due_input("today"), Some(today));
        assert_eq!(parse_due_input(" Tomorrow "), Some(today + Duration::days(1)));
        assert_eq!(parse_due_input("in 3d"), Some(today + Duration::days(3)));
        assert_eq!(parse_due_input("in 2w"), Some(today + Duration::weeks(2)));
        assert_eq!(
            parse_due_input("2024-01-31"),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
        assert_eq!(parse_due_input("someday"), None);
        assert_eq!(parse_due_input(""), None);
    }

    #[test]
    fn format_due_relative_covers_both_directions() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(format_due_relative(today, today), "today");
        assert_eq!(
            format_due_relative(today + Duration::days(1), today),
            "tomorrow"
        );
        assert_eq!(format_due_relative(today + Duration::days(5), today), "in 5d");
        assert_eq!(
            format_due_relative(today - Duration::days(2), today),
            "2d late"
        );
    }
}
