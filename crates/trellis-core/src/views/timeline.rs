//! Gantt geometry: bar position and width as fractions of a visible
//! window, plus the presentation-only row ordering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// The visible `[start, end]` date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimelineWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    fn span_days(&self) -> f64 {
        // A degenerate window still divides cleanly.
        (self.end - self.start).num_days().max(1) as f64
    }
}

/// The dated extent of a task. Tasks with neither date have no span and
/// never enter the geometry computation; a single-sided date collapses
/// to a zero-length span on that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimelineSpan {
    pub fn from_task(task: &Task) -> Option<Self> {
        match (task.start_date, task.end_date) {
            (None, None) => None,
            (Some(start), Some(end)) => Some(Self { start, end }),
            (Some(start), None) => Some(Self { start, end: start }),
            (None, Some(end)) => Some(Self { start: end, end }),
        }
    }
}

/// Bar placement, both fields in `[0, 1]` of the window width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f64,
    pub width: f64,
}

pub fn bar_left_fraction(span: TimelineSpan, window: TimelineWindow) -> f64 {
    let offset = (span.start - window.start).num_days() as f64;
    (offset / window.span_days()).clamp(0.0, 1.0)
}

pub fn bar_width_fraction(span: TimelineSpan, window: TimelineWindow) -> f64 {
    let length = (span.end - span.start).num_days() as f64;
    (length / window.span_days()).clamp(0.0, 1.0)
}

pub fn bar_geometry(span: TimelineSpan, window: TimelineWindow) -> BarGeometry {
    BarGeometry {
        left: bar_left_fraction(span, window),
        width: bar_width_fraction(span, window),
    }
}

/// Projects every dated task onto the window. Undated tasks are absent
/// from the result, not merely zero-sized.
pub fn project<'a>(tasks: &'a [Task], window: TimelineWindow) -> Vec<(&'a Task, BarGeometry)> {
    tasks
        .iter()
        .filter_map(|task| {
            TimelineSpan::from_task(task).map(|span| (task, bar_geometry(span, window)))
        })
        .collect()
}

/// Display order of timeline rows. Purely presentational: reordering
/// rows never touches task state and never issues a mutation.
#[derive(Debug, Clone, Default)]
pub struct RowOrder {
    order: Vec<TaskId>,
}

impl RowOrder {
    /// Reconciles with the canonical set: unseen tasks are appended in
    /// canonical order, rows for vanished tasks are dropped.
    pub fn sync(&mut self, tasks: &[Task]) {
        self.order.retain(|id| tasks.iter().any(|t| t.id == *id));
        for task in tasks {
            if !self.order.contains(&task.id) {
                self.order.push(task.id);
            }
        }
    }

    /// Moves a row to `to_index` (clamped to the row count). Returns
    /// false when the task has no row.
    pub fn move_row(&mut self, task_id: TaskId, to_index: usize) -> bool {
        let Some(from) = self.order.iter().position(|id| *id == task_id) else {
            return false;
        };
        let id = self.order.remove(from);
        let to = to_index.min(self.order.len());
        self.order.insert(to, id);
        true
    }

    pub fn ordered<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        self.order
            .iter()
            .filter_map(|id| tasks.iter().find(|t| t.id == *id))
            .collect()
    }
}
