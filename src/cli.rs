use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed personal task tracker.
/// Storage defaults to ~/.taskflow/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tf", version, about = "Personal task tracking CLI and TUI")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
