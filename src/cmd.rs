//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers for every subcommand, from the
//! CRUD operations and list filtering through to the dashboard stats and
//! the TUI launcher.

use std::io;
use std::path::Path;

use chrono::Local;
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::fields::{Label, Priority, SortKey, Status};
use crate::store::{format_due_relative, StoreError, TaskStore};
use crate::task::{Draft, FieldErrors, Task};
use crate::tui::run::run_tui;
use crate::view::{self, TaskQuery};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard UI.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd". Defaults to today.
        #[arg(long)]
        due: Option<String>,
        /// Status: not-started | in-progress | completed.
        #[arg(long, value_enum, default_value_t = Status::NotStarted)]
        status: Status,
        /// Priority: low | medium | high | urgent.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Label from the fixed vocabulary. May be repeated.
        #[arg(long = "label", value_enum)]
        labels: Vec<Label>,
    },

    /// List tasks with optional filters.
    List {
        /// Case-insensitive search across title and description.
        #[arg(long)]
        search: Option<String>,
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by label.
        #[arg(long, value_enum)]
        label: Option<Label>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Newest)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task by id.
    View {
        /// Task id to view.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task id to update.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Add a label. May be repeated.
        #[arg(long = "add-label", value_enum)]
        add_labels: Vec<Label>,
        /// Remove a label. May be repeated.
        #[arg(long = "rm-label", value_enum)]
        rm_labels: Vec<Label>,
    },

    /// Flip a task between completed and not started.
    Toggle {
        /// Task id to toggle.
        id: String,
    },

    /// Delete a task by id.
    Delete {
        /// Task id to delete.
        id: String,
    },

    /// Show task counts by status.
    Stats,

    /// List the label vocabulary with usage counts.
    Labels,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(db_path: &Path, data_dir: &Path) {
    if let Err(e) = run_tui(db_path, data_dir) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
pub fn cmd_add(
    store: &mut TaskStore,
    title: String,
    desc: Option<String>,
    due: Option<String>,
    status: Status,
    priority: Priority,
    labels: Vec<Label>,
) {
    let draft = Draft {
        title,
        description: desc.unwrap_or_default(),
        status,
        priority,
        due: due.unwrap_or_else(|| Local::now().date_naive().to_string()),
        labels: dedup_labels(labels),
    };
    match store.create(&draft) {
        Ok(task) => println!("Added task {}", task.id),
        Err(StoreError::Validation(errors)) => {
            report_field_errors(&errors);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// List tasks with optional filtering and sorting.
pub fn cmd_list(
    store: &TaskStore,
    search: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    label: Option<Label>,
    sort: SortKey,
    limit: Option<usize>,
) {
    let query = TaskQuery {
        search: search.unwrap_or_default(),
        status,
        priority,
        label,
        sort,
    };
    let mut projection = view::apply(&store.tasks, &query);
    if let Some(n) = limit {
        projection.truncate(n);
    }
    print_table(&projection);
}

/// View detailed information about a specific task.
pub fn cmd_view(store: &TaskStore, id: &str) {
    let Some(task) = store.get(id) else {
        eprintln!("Task {id} not found.");
        std::process::exit(1);
    };
    let today = Local::now().date_naive();
    println!("ID:          {}", task.id);
    println!("Title:       {}", task.title);
    println!("Status:      {}", task.status.display_name());
    println!("Priority:    {}", task.priority.display_name());
    println!(
        "Due:         {} ({})",
        task.due,
        format_due_relative(task.due, today)
    );
    println!("Labels:      {}", join_labels(&task.labels));
    println!("Created:     {}", task.created_at.to_rfc3339());
    println!("Updated:     {}", task.updated_at.to_rfc3339());
    println!(
        "Description:\n{}",
        if task.description.is_empty() {
            "-"
        } else {
            &task.description
        }
    );
}

/// Update an existing task's fields.
pub fn cmd_update(
    store: &mut TaskStore,
    id: &str,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    status: Option<Status>,
    priority: Option<Priority>,
    add_labels: Vec<Label>,
    rm_labels: Vec<Label>,
) {
    let Some(task) = store.get(id) else {
        eprintln!("Task {id} not found.");
        std::process::exit(1);
    };

    let mut draft = Draft::from_task(task);
    if let Some(t) = title {
        draft.title = t;
    }
    if let Some(d) = desc {
        draft.description = d;
    }
    if let Some(d) = due {
        draft.due = d;
    }
    if let Some(s) = status {
        draft.status = s;
    }
    if let Some(p) = priority {
        draft.priority = p;
    }
    for l in add_labels {
        if !draft.labels.contains(&l) {
            draft.labels.push(l);
        }
    }
    draft.labels.retain(|l| !rm_labels.contains(l));

    match store.update(id, &draft) {
        Ok(()) => println!("Updated task {id}"),
        Err(StoreError::Validation(errors)) => {
            report_field_errors(&errors);
            std::process::exit(1);
        }
        Err(StoreError::NotFound(_)) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Flip a task between completed and not started.
pub fn cmd_toggle(store: &mut TaskStore, id: &str) {
    match store.toggle_status(id) {
        Ok(status) => println!("Task marked as {}", status.display_name()),
        Err(StoreError::NotFound(_)) => {
            eprintln!("Task {id} not found.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Delete a task by id. Deleting an id that is not present is not an error,
/// but only an actual removal is announced as one.
pub fn cmd_delete(store: &mut TaskStore, id: &str) {
    match store.delete(id) {
        Ok(true) => println!("Deleted task {id}"),
        Ok(false) => println!("Task {id} not found; nothing deleted."),
        Err(e) => {
            eprintln!("Failed to save tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Print task counts by status.
pub fn cmd_stats(store: &TaskStore) {
    let counts = store.counts();
    println!("Total:        {}", counts.total);
    println!("Completed:    {}", counts.completed);
    println!("In Progress:  {}", counts.in_progress);
    println!("Not Started:  {}", counts.not_started);
}

/// Print the label vocabulary with usage counts.
pub fn cmd_labels(store: &TaskStore) {
    for label in Label::ALL {
        let count = store
            .tasks
            .iter()
            .filter(|t| t.labels.contains(&label))
            .count();
        println!("{:<10} {}", label.display_name(), count);
    }
}

/// Generate shell completion scripts on stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tf", &mut io::stdout());
}

/// Print validation errors, one per field.
fn report_field_errors(errors: &FieldErrors) {
    if let Some(msg) = errors.title {
        eprintln!("title: {msg}");
    }
    if let Some(msg) = errors.due {
        eprintln!("due: {msg}");
    }
}

/// Print tasks in a formatted table.
fn print_table(tasks: &[&Task]) {
    println!(
        "{:<14} {:<12} {:<7} {:<10} {:<22} {}",
        "ID", "Status", "Pri", "Due", "Labels", "Title"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        println!(
            "{:<14} {:<12} {:<7} {:<10} {:<22} {}",
            t.id,
            t.status.display_name(),
            t.priority.display_name(),
            format_due_relative(t.due, today),
            truncate(&join_labels(&t.labels), 22),
            t.title
        );
    }
}

/// Join labels for display, or a dash when there are none.
fn join_labels(labels: &[Label]) -> String {
    if labels.is_empty() {
        "-".to_string()
    } else {
        labels
            .iter()
            .map(|l| l.display_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Drop duplicate labels while keeping first-seen order.
fn dedup_labels(labels: Vec<Label>) -> Vec<Label> {
    let mut out = Vec::new();
    for l in labels {
        if !out.contains(&l) {
            out.push(l);
        }
    }
    out
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings_intact() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn dedup_labels_keeps_first_seen_order() {
        let labels = vec![Label::Work, Label::Health, Label::Work];
        assert_eq!(dedup_labels(labels), vec![Label::Work, Label::Health]);
    }
}
