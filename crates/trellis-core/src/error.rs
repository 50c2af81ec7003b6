use chrono::NaiveDate;
use thiserror::Error;

use crate::task::TaskId;

/// Local, synchronous rejections. These fire before any mutation is
/// dispatched to the persistence backend; nothing is partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task {task} cannot depend on {candidate}: the dependency chain would loop back")]
    DependencyCycle { task: TaskId, candidate: TaskId },

    #[error("start date {start} falls after end date {end}")]
    DateRange { start: NaiveDate, end: NaiveDate },
}
