//! Search/category filtering applied to the canonical set before any
//! projection, plus the input debouncer that keeps projections from
//! recomputing on every keystroke.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::task::{Category, Task};

/// Delay before a search edit is considered settled.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => only == category,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskFilter {
    pub query: String,
    pub category: CategoryFilter,
}

impl TaskFilter {
    pub fn is_passthrough(&self) -> bool {
        self.query.trim().is_empty() && self.category == CategoryFilter::All
    }

    /// A task passes iff the query (when non-empty) case-insensitively
    /// matches title, description, or id, and the category filter agrees.
    pub fn matches(&self, task: &Task) -> bool {
        if !self.category.matches(task.category) {
            return false;
        }

        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(&query)
            || task.description.to_lowercase().contains(&query)
            || task.id.to_string().contains(&query)
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

/// Fixed-delay settling for search input. The caller feeds every
/// keystroke through [`SearchDebouncer::note_input`] and polls; the
/// clock is passed in so tests stay deterministic.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending_since: Option<Instant>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    pub fn note_input(&mut self, at: Instant) {
        self.pending_since = Some(at);
    }

    pub fn has_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// True (once) when the last input has settled; clears the pending
    /// marker so the caller recomputes exactly one projection per burst.
    pub fn poll(&mut self, at: Instant) -> bool {
        match self.pending_since {
            Some(since) if at.duration_since(since) >= self.delay => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use chrono::{TimeZone, Utc};

    use super::{CategoryFilter, SearchDebouncer, TaskFilter};
    use crate::task::{Category, Task, TaskDraft};

    fn task(title: &str, description: &str, category: Category) -> Task {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Task::new(
            TaskDraft {
                title: title.to_string(),
                description: description.to_string(),
                priority: Default::default(),
                category,
                dependency: None,
                start_date: None,
                end_date: None,
            },
            now,
        )
        .unwrap()
    }

    #[test]
    fn query_matches_title_description_and_id() {
        let t = task("Design schema", "tables for the planner", Category::Modeling);

        let by_title = TaskFilter {
            query: "SCHEMA".to_string(),
            category: CategoryFilter::All,
        };
        assert!(by_title.matches(&t));

        let by_description = TaskFilter {
            query: "planner".to_string(),
            category: CategoryFilter::All,
        };
        assert!(by_description.matches(&t));

        let by_id = TaskFilter {
            query: t.id.to_string()[..8].to_string(),
            category: CategoryFilter::All,
        };
        assert!(by_id.matches(&t));

        let miss = TaskFilter {
            query: "deploy".to_string(),
            category: CategoryFilter::All,
        };
        assert!(!miss.matches(&t));
    }

    #[test]
    fn category_filter_is_an_equality_guard() {
        let t = task("a", "", Category::Ux);
        let only_ux = TaskFilter {
            query: String::new(),
            category: CategoryFilter::Only(Category::Ux),
        };
        let only_ai = TaskFilter {
            query: String::new(),
            category: CategoryFilter::Only(Category::Ai),
        };
        assert!(only_ux.matches(&t));
        assert!(!only_ai.matches(&t));
    }

    #[test]
    fn blank_query_passes_everything() {
        let t = task("anything", "", Category::Foundation);
        let filter = TaskFilter {
            query: "   ".to_string(),
            category: CategoryFilter::All,
        };
        assert!(filter.is_passthrough());
        assert!(filter.matches(&t));
    }

    #[test]
    fn apply_keeps_canonical_order() {
        let tasks = vec![
            task("alpha release", "", Category::Foundation),
            task("beta notes", "", Category::Ux),
            task("alpha cleanup", "", Category::Foundation),
        ];
        let filter = TaskFilter {
            query: "alpha".to_string(),
            category: CategoryFilter::All,
        };
        let kept: Vec<_> = filter.apply(&tasks).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(kept, vec!["alpha release", "alpha cleanup"]);
    }

    #[test]
    fn debouncer_fires_once_after_the_burst_settles() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(500));

        debouncer.note_input(start);
        debouncer.note_input(start + Duration::from_millis(200));
        assert!(!debouncer.poll(start + Duration::from_millis(400)));

        assert!(debouncer.poll(start + Duration::from_millis(800)));
        // Settled; nothing further until new input arrives.
        assert!(!debouncer.poll(start + Duration::from_millis(900)));
        assert!(!debouncer.has_pending());
    }
}
