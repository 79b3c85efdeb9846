//! # TaskFlow - personal task tracker
//!
//! A small, file-backed task tracker with a full CLI for scripting and an
//! interactive TUI dashboard for everyday use.
//!
//! ## Key Features
//!
//! - **Task Records**: status, priority, due dates, and a fixed label
//!   vocabulary (Work, Personal, Health, Finance, Learning)
//! - **Filtering & Sorting**: search across title and description, filter by
//!   status/priority/label, sort by age, due date, or priority
//! - **Dashboard TUI**: live clock, counts by status, inline task form with
//!   field validation, dark/light themes
//! - **Local File Storage**: one JSON file, fully rewritten on every change;
//!   a corrupt file starts fresh rather than crashing
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the dashboard UI
//! tf ui
//!
//! # Add a task via CLI
//! tf add "Buy milk" --due tomorrow --priority high --label personal
//!
//! # List open work tasks, most urgent first
//! tf list --status not-started --label work --sort priority
//!
//! # Mark it done
//! tf toggle 1718035200000
//! ```
//!
//! Data is stored locally in `~/.taskflow/`: the task collection in
//! `tasks.json` and interface preferences in `settings.json`.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod fields;
pub mod settings;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    // Determine the data directory.
    let data_dir = if let Some(db_path) = cli.db.as_ref() {
        db_path
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .to_path_buf()
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".taskflow");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create data directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir
    };

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| data_dir.join("tasks.json"));

    // Commands that manage their own store lifecycle.
    match &cli.command {
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        Commands::Ui => {
            cmd_ui(&db_path, &data_dir);
            return;
        }
        _ => {}
    }

    let mut store = TaskStore::load(&db_path);

    match cli.command {
        Commands::Ui => unreachable!("UI command handled above"),
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add {
            title,
            desc,
            due,
            status,
            priority,
            labels,
        } => cmd_add(&mut store, title, desc, due, status, priority, labels),

        Commands::List {
            search,
            status,
            priority,
            label,
            sort,
            limit,
        } => cmd_list(&store, search, status, priority, label, sort, limit),

        Commands::View { id } => cmd_view(&store, &id),

        Commands::Update {
            id,
            title,
            desc,
            due,
            status,
            priority,
            add_labels,
            rm_labels,
        } => cmd_update(
            &mut store, &id, title, desc, due, status, priority, add_labels, rm_labels,
        ),

        Commands::Toggle { id } => cmd_toggle(&mut store, &id),

        Commands::Delete { id } => cmd_delete(&mut store, &id),

        Commands::Stats => cmd_stats(&store),

        Commands::Labels => cmd_labels(&store),
    }
}
