//! Filtered, sorted projections of the task collection.
//!
//! The same query type drives the CLI `list` command and the TUI list view,
//! so the two surfaces can never disagree about what is shown. Projections
//! are recomputed in full on every change; the collection is small enough
//! that incremental updates would buy nothing.

use crate::fields::{Label, Priority, SortKey, Status};
use crate::task::Task;

/// Filter and sort criteria for a task view projection.
///
/// `None` on a filter means "All".
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub search: String,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub label: Option<Label>,
    pub sort: SortKey,
}

impl TaskQuery {
    /// True when every filter predicate holds for the task.
    fn matches(&self, task: &Task) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !task.title.to_lowercase().contains(&needle)
                && !task.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(s) = self.status {
            if task.status != s {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }
        if let Some(l) = self.label {
            if !task.labels.contains(&l) {
                return false;
            }
        }
        true
    }

    /// True when any filter deviates from the defaults.
    pub fn is_filtering(&self) -> bool {
        !self.search.is_empty()
            || self.status.is_some()
            || self.priority.is_some()
            || self.label.is_some()
    }
}

/// Apply a query to the collection, returning matching tasks in sort order.
///
/// Sorting is stable: ties keep their original collection order.
pub fn apply<'a>(tasks: &'a [Task], query: &TaskQuery) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks.iter().filter(|t| query.matches(t)).collect();
    match query.sort {
        SortKey::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::DueDate => out.sort_by(|a, b| a.due.cmp(&b.due)),
        SortKey::Priority => out.sort_by_key(|t| t.priority.rank()),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn task(id: &str, title: &str, desc: &str) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            description: desc.into(),
            status: Status::NotStarted,
            priority: Priority::Medium,
            due: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            labels: Vec::new(),
            created_at: at(0),
            updated_at: at(0),
        }
    }

    fn titles(projection: &[&Task]) -> Vec<String> {
        projection.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn status_filter_keeps_only_matching_tasks() {
        let mut done = task("1", "Done thing", "");
        done.status = Status::Completed;
        let tasks = vec![done, task("2", "Open thing", "")];

        let query = TaskQuery {
            status: Some(Status::Completed),
            ..Default::default()
        };
        assert_eq!(titles(&apply(&tasks, &query)), vec!["Done thing"]);
    }

    #[test]
    fn search_is_case_insensitive_across_title_and_description() {
        let tasks = vec![
            task("1", "Buy MILK", ""),
            task("2", "Call dentist", "about milk teeth"),
            task("3", "Unrelated", ""),
        ];

        let query = TaskQuery {
            search: "milk".into(),
            ..Default::default()
        };
        assert_eq!(
            titles(&apply(&tasks, &query)),
            vec!["Buy MILK", "Call dentist"]
        );
    }

    #[test]
    fn search_combines_with_status_filter() {
        let mut done = task("1", "Buy milk", "");
        done.status = Status::Completed;
        let tasks = vec![done, task("2", "Buy milk again", "")];

        let query = TaskQuery {
            search: "milk".into(),
            status: Some(Status::Completed),
            ..Default::default()
        };
        assert_eq!(titles(&apply(&tasks, &query)), vec!["Buy milk"]);
    }

    #[test]
    fn label_filter_requires_membership() {
        let mut work = task("1", "Standup", "");
        work.labels = vec![Label::Work, Label::Learning];
        let tasks = vec![work, task("2", "Jog", "")];

        let query = TaskQuery {
            label: Some(Label::Work),
            ..Default::default()
        };
        assert_eq!(titles(&apply(&tasks, &query)), vec!["Standup"]);

        let query = TaskQuery {
            label: Some(Label::Finance),
            ..Default::default()
        };
        assert!(apply(&tasks, &query).is_empty());
    }

    #[test]
    fn priority_sort_ranks_urgent_first() {
        let mut low = task("1", "Low", "");
        low.priority = Priority::Low;
        let mut urgent = task("2", "Urgent", "");
        urgent.priority = Priority::Urgent;
        let medium = task("3", "Medium", "");
        let tasks = vec![low, urgent, medium];

        let query = TaskQuery {
            sort: SortKey::Priority,
            ..Default::default()
        };
        assert_eq!(
            titles(&apply(&tasks, &query)),
            vec!["Urgent", "Medium", "Low"]
        );
    }

    #[test]
    fn newest_and_oldest_sort_by_creation_time() {
        let mut first = task("1", "First", "");
        first.created_at = at(0);
        let mut second = task("2", "Second", "");
        second.created_at = at(60);
        let tasks = vec![first, second];

        let newest = TaskQuery::default();
        assert_eq!(titles(&apply(&tasks, &newest)), vec!["Second", "First"]);

        let oldest = TaskQuery {
            sort: SortKey::Oldest,
            ..Default::default()
        };
        assert_eq!(titles(&apply(&tasks, &oldest)), vec!["First", "Second"]);
    }

    #[test]
    fn due_date_sort_is_ascending() {
        let mut late = task("1", "Late", "");
        late.due = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let mut soon = task("2", "Soon", "");
        soon.due = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let tasks = vec![late, soon];

        let query = TaskQuery {
            sort: SortKey::DueDate,
            ..Default::default()
        };
        assert_eq!(titles(&apply(&tasks, &query)), vec!["Soon", "Late"]);
    }

    #[test]
    fn ties_keep_collection_order() {
        // Same priority throughout: the projection must preserve insertion
        // order under the priority sort.
        let tasks = vec![task("1", "a", ""), task("2", "b", ""), task("3", "c", "")];
        let query = TaskQuery {
            sort: SortKey::Priority,
            ..Default::default()
        };
        assert_eq!(titles(&apply(&tasks, &query)), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_query_returns_everything() {
        let tasks = vec![task("1", "a", ""), task("2", "b", "")];
        let query = TaskQuery::default();
        assert_eq!(apply(&tasks, &query).len(), 2);
        assert!(!query.is_filtering());
    }
}
