//! JSON records exchanged with the REST persistence backend, and the
//! validation between that wire shape and the typed model.
//!
//! The wire keeps two legacies the model deliberately does not:
//! `dependencies` is an array (of length zero or one), and `completed`
//! is a separate `0|1` field. Both are checked on decode so nothing
//! downstream has to re-verify shape, and both are derived from the
//! model on encode so they can never disagree with `status`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trellis_core::task::{
    Category, Priority, Status, Subtask, Task, TaskDraft, TaskId, TaskPatch,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("task {id} carries {count} dependencies; at most one is allowed")]
    TooManyDependencies { id: TaskId, count: usize },

    #[error("task {id}: completed flag must be 0 or 1, got {flag}")]
    InvalidCompletedFlag { id: TaskId, flag: u8 },

    #[error("task {id}: completed flag {flag} disagrees with status {status}")]
    CompletedMismatch {
        id: TaskId,
        flag: u8,
        status: &'static str,
    },

    #[error("task {id}: start date {start} falls after end date {end}")]
    InvertedDateRange {
        id: TaskId,
        start: NaiveDate,
        end: NaiveDate,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskRecord {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Subtask> for SubtaskRecord {
    fn from(subtask: Subtask) -> Self {
        Self {
            id: subtask.id,
            title: subtask.title,
            completed: subtask.completed,
            created_at: subtask.created_at,
        }
    }
}

impl From<SubtaskRecord> for Subtask {
    fn from(record: SubtaskRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            completed: record.completed,
            created_at: record.created_at,
        }
    }
}

/// One task as the backend stores it (`GET /tasks` element, and the body
/// returned by `POST`/`PATCH`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    pub category: Category,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub subtasks: Vec<SubtaskRecord>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub completed: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Boundary validation: shape problems are caught here, once, so the
    /// engine can rely on the typed invariants everywhere else.
    pub fn into_task(self) -> Result<Task, DecodeError> {
        if self.dependencies.len() > 1 {
            return Err(DecodeError::TooManyDependencies {
                id: self.id,
                count: self.dependencies.len(),
            });
        }
        if self.completed > 1 {
            return Err(DecodeError::InvalidCompletedFlag {
                id: self.id,
                flag: self.completed,
            });
        }
        let completed = self.completed == 1;
        if completed != (self.status == Status::Completed) {
            return Err(DecodeError::CompletedMismatch {
                id: self.id,
                flag: self.completed,
                status: self.status.as_str(),
            });
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(DecodeError::InvertedDateRange {
                id: self.id,
                start,
                end,
            });
        }

        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            category: self.category,
            dependency: self.dependencies.into_iter().next(),
            subtasks: self.subtasks.into_iter().map(Subtask::from).collect(),
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        })
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            category: task.category,
            dependencies: task.dependency.into_iter().collect(),
            subtasks: task
                .subtasks
                .iter()
                .cloned()
                .map(SubtaskRecord::from)
                .collect(),
            start_date: task.start_date,
            end_date: task.end_date,
            completed: u8::from(task.is_completed()),
            created_at: task.created_at,
            updated_at: task.updated_at,
            completed_at: task.completed_at,
        }
    }
}

/// `POST /tasks` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl CreateBody {
    pub fn from_draft(draft: &TaskDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            category: draft.category,
            dependencies: draft.dependency.into_iter().collect(),
            start_date: draft.start_date,
            end_date: draft.end_date,
        }
    }
}

/// `PATCH /tasks/{id}` body. Absent fields are untouched; clearable
/// fields serialize an explicit `null` to clear (outer option absent vs
/// inner option null).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Accompanies every status change so the stored flag can never
    /// drift from the status the backend persists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<TaskId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<SubtaskRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
}

impl PatchBody {
    pub fn from_patch(patch: &TaskPatch) -> Self {
        Self {
            title: patch.title.clone(),
            description: patch.description.clone(),
            status: patch.status,
            completed: patch
                .status
                .map(|status| u8::from(status == Status::Completed)),
            priority: patch.priority,
            category: patch.category,
            dependencies: patch
                .dependency
                .map(|dependency| dependency.into_iter().collect()),
            subtasks: patch.subtasks.as_ref().map(|subtasks| {
                subtasks
                    .iter()
                    .cloned()
                    .map(SubtaskRecord::from)
                    .collect()
            }),
            start_date: patch.start_date,
            end_date: patch.end_date,
        }
    }
}
