//! The drag-and-drop gesture as an explicit state machine.
//!
//! The coordinator never mutates task state itself. While a gesture is
//! active it only tracks the candidate destination for visual feedback;
//! releasing it yields at most one [`DropMutation`], which the store
//! turns into exactly one remote PATCH.

use thiserror::Error;
use tracing::debug;

use crate::task::{Status, TaskId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        task: TaskId,
        origin: Status,
        candidate: Option<Status>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    /// Only one gesture may be active; a second drag-start is rejected,
    /// never queued.
    #[error("a drag gesture is already in progress")]
    GestureInProgress,
}

/// The single mutation command a completed drag produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropMutation {
    pub task: TaskId,
    pub origin: Status,
    pub destination: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped on a different container: one store mutation is due.
    Moved(DropMutation),
    /// Dropped back on the origin container: presentation-only, no
    /// mutation and no network traffic.
    Reordered { task: TaskId, container: Status },
    /// Released without a valid destination.
    Cancelled,
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    state: DragState,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn active_task(&self) -> Option<TaskId> {
        match self.state {
            DragState::Dragging { task, .. } => Some(task),
            DragState::Idle => None,
        }
    }

    pub fn begin(&mut self, task: TaskId, origin: Status) -> Result<(), DragError> {
        if self.is_dragging() {
            debug!(%task, "rejecting drag-start while a gesture is active");
            return Err(DragError::GestureInProgress);
        }
        self.state = DragState::Dragging {
            task,
            origin,
            candidate: None,
        };
        Ok(())
    }

    /// Updates the candidate destination under the pointer. `None` means
    /// the pointer left every container. Ignored while idle.
    pub fn hover(&mut self, container: Option<Status>) {
        if let DragState::Dragging { candidate, .. } = &mut self.state {
            *candidate = container;
        }
    }

    /// Ends the gesture over whatever container was last hovered and
    /// returns to idle.
    pub fn release(&mut self) -> DropOutcome {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging {
            task,
            origin,
            candidate,
        } = state
        else {
            return DropOutcome::Cancelled;
        };

        match candidate {
            None => {
                debug!(%task, "drag released outside any container");
                DropOutcome::Cancelled
            }
            Some(destination) if destination == origin => DropOutcome::Reordered {
                task,
                container: origin,
            },
            Some(destination) => {
                debug!(%task, origin = origin.as_str(), destination = destination.as_str(), "drop");
                DropOutcome::Moved(DropMutation {
                    task,
                    origin,
                    destination,
                })
            }
        }
    }

    /// Aborts the gesture (escape key, window blur). No mutation.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
