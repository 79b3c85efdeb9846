//! Colour themes and badge colours for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

/// Used for Not Started tasks
pub const AMBER: Color = Color::Rgb(245, 158, 11);
/// Used for High priority badges
pub const ORANGE: Color = Color::Rgb(249, 115, 22);
/// Primary accent
pub const INDIGO: Color = Color::Rgb(99, 102, 241);
/// Confirm dialog background
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);

/// A named colour scheme, toggled at runtime and persisted in settings.
#[derive(Clone, Copy, PartialEq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Main text colour.
    pub fn text(self) -> Color {
        match self {
            Theme::Dark => Color::White,
            Theme::Light => Color::Black,
        }
    }

    /// Secondary text colour for hints and metadata.
    pub fn muted(self) -> Color {
        match self {
            Theme::Dark => Color::DarkGray,
            Theme::Light => Color::Gray,
        }
    }

    /// Background for the selected list row.
    pub fn highlight_bg(self) -> Color {
        match self {
            Theme::Dark => Color::Gray,
            Theme::Light => Color::Rgb(224, 224, 235),
        }
    }

    /// Foreground for the selected list row.
    pub fn highlight_fg(self) -> Color {
        Color::Black
    }
}

/// Badge colour for a priority level.
pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::Urgent => Color::Red,
        Priority::High => ORANGE,
        Priority::Medium => Color::Blue,
        Priority::Low => Color::Green,
    }
}

/// Colour for a status marker.
pub fn status_color(s: Status) -> Color {
    match s {
        Status::Completed => Color::Green,
        Status::InProgress => Color::Blue,
        Status::NotStarted => AMBER,
    }
}
