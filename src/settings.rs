//! Persisted interface preferences.
//!
//! Stored as a small JSON sidecar beside the task file, with the same
//! start-fresh policy when the file is missing or unparseable. Kept separate
//! from the task collection so either file can be recovered independently.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

const SETTINGS_FILE: &str = "settings.json";

/// Interface preferences (written to settings.json).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Settings {
    /// Dark colour scheme for the TUI.
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
}

fn default_dark_mode() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings { dark_mode: true }
    }
}

impl Settings {
    /// Read settings from the data directory, falling back to defaults.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Write settings to the data directory.
    pub fn save(&self, dir: &Path) -> std::io::Result<()> {
        let path = dir.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let settings = Settings { dark_mode: false };
        settings.save(dir.path()).unwrap();

        let loaded = Settings::load(dir.path());
        assert!(!loaded.dark_mode);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        assert!(Settings::load(dir.path()).dark_mode);
    }

    #[test]
    fn garbage_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "»not json«").unwrap();
        assert!(Settings::load(dir.path()).dark_mode);
    }
}
