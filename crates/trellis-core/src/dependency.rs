//! Cycle prevention for the single-parent dependency relation.
//!
//! Every task points at zero or one predecessor, so the relation is a
//! forest as long as no chain loops back on itself. These checks are pure
//! and synchronous; the store calls them before any dependency-changing
//! mutation leaves the process.

use std::collections::HashSet;

use tracing::trace;

use crate::error::ValidationError;
use crate::task::{Task, TaskId};

/// True when assigning `candidate` as the dependency of `task_id` would
/// close a loop: either a self-dependency, or the chain walked from
/// `candidate` reaches `task_id`.
///
/// A visited set guards the walk, so data that already contains a loop
/// (which should never happen, but may arrive from a corrupt backend)
/// terminates and is reported as cyclic rather than spinning.
pub fn would_create_cycle(tasks: &[Task], task_id: TaskId, candidate: TaskId) -> bool {
    if candidate == task_id {
        return true;
    }

    let mut visited: HashSet<TaskId> = HashSet::new();
    let mut cursor = Some(candidate);
    while let Some(current) = cursor {
        if current == task_id {
            return true;
        }
        if !visited.insert(current) {
            trace!(%task_id, %candidate, "dependency chain already loops");
            return true;
        }
        cursor = tasks
            .iter()
            .find(|t| t.id == current)
            .and_then(|t| t.dependency);
    }

    false
}

/// The synchronous gate in front of every dependency-changing mutation.
pub fn validate_dependency(
    tasks: &[Task],
    task_id: TaskId,
    candidate: Option<TaskId>,
) -> Result<(), ValidationError> {
    let Some(candidate) = candidate else {
        return Ok(());
    };
    if would_create_cycle(tasks, task_id, candidate) {
        trace!(%task_id, %candidate, "rejecting dependency assignment");
        return Err(ValidationError::DependencyCycle {
            task: task_id,
            candidate,
        });
    }
    Ok(())
}

/// Tasks that `task_id` may legally depend on. Selector UIs offer this
/// list so an invalid choice is never presented.
pub fn eligible_dependencies(tasks: &[Task], task_id: TaskId) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.id != task_id && !would_create_cycle(tasks, task_id, t.id))
        .collect()
}
