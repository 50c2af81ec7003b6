//! Pure projections from the (filtered) canonical task set to
//! view-specific shapes. No view keeps its own copy of task state; each
//! re-derives from the canonical set on every update.

pub mod board;
pub mod calendar;
pub mod timeline;
