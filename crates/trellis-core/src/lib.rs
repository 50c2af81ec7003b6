//! Trellis planning engine: the canonical task model, its single-parent
//! dependency graph, pure per-view projections, and the drag-and-drop
//! state machine. Everything here is side-effect free; synchronization
//! with the persistence backend lives in `trellis_store`.

pub mod dependency;
pub mod drag;
pub mod error;
pub mod filter;
pub mod task;
pub mod views;

pub use error::ValidationError;
pub use task::{Category, Priority, Status, Subtask, Task, TaskDraft, TaskId, TaskPatch};
