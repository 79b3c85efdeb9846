//! Enumerations and field types for task records.
//!
//! This module defines the structured data types used to categorise tasks:
//! completion status, priority level, the fixed label vocabulary, and the
//! available sort keys for list views.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task completion status.
///
/// The serde aliases accept the spaced spellings found in task files written
/// by older builds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    #[serde(alias = "Not Started")]
    NotStarted,
    #[serde(alias = "In Progress")]
    InProgress,
    #[serde(alias = "Completed")]
    Completed,
}

impl Status {
    /// Human-readable name for display.
    pub fn display_name(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }

    /// Checkbox-style marker for list rows.
    pub fn marker(self) -> &'static str {
        match self {
            Status::NotStarted => "[ ]",
            Status::InProgress => "[>]",
            Status::Completed => "[x]",
        }
    }
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "Low")]
    Low,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Urgent")]
    Urgent,
}

impl Priority {
    /// Human-readable name for display.
    pub fn display_name(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    /// Sort rank: Urgent first, Low last.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

/// The closed label vocabulary.
///
/// Labels are many-to-many with tasks; membership of the vocabulary is
/// enforced by this type rather than by runtime checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
pub enum Label {
    Work,
    Personal,
    Health,
    Finance,
    Learning,
}

impl Label {
    /// Every label, in display order.
    pub const ALL: [Label; 5] = [
        Label::Work,
        Label::Personal,
        Label::Health,
        Label::Finance,
        Label::Learning,
    ];

    /// Human-readable name for display.
    pub fn display_name(self) -> &'static str {
        match self {
            Label::Work => "Work",
            Label::Personal => "Personal",
            Label::Health => "Health",
            Label::Finance => "Finance",
            Label::Learning => "Learning",
        }
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    /// Oldest first.
    Oldest,
    /// Earliest due date first.
    DueDate,
    /// Urgent before High before Medium before Low.
    Priority,
}

impl SortKey {
    /// Human-readable name for display.
    pub fn display_name(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::Oldest => "Oldest",
            SortKey::DueDate => "Due Date",
            SortKey::Priority => "Priority",
        }
    }
}
