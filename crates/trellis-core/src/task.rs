use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

pub type TaskId = Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Todo,
    InProgress,
    Completed,
}

impl Status {
    /// Board lanes in display order; also the `Ord` used by bucket maps.
    pub const LANES: [Status; 3] = [Status::Todo, Status::InProgress, Status::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Todo => "todo",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Foundation,
    Modeling,
    Ai,
    Integration,
    Ux,
    KnowledgeBase,
}

/// Owned exclusively by its parent task; created, removed, and toggled
/// only through the parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subtask {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// The canonical task. `completed` is not stored: it is derived from
/// `status` (see [`Task::is_completed`]) so the two can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub category: Category,
    /// At most one predecessor; the relation over the whole set must stay
    /// acyclic (enforced by `dependency::validate_dependency`).
    pub dependency: Option<TaskId>,
    pub subtasks: Vec<Subtask>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Creation payload. Tasks always start in `todo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub category: Category,
    #[serde(default)]
    pub dependency: Option<TaskId>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// Partial update. Outer `None` leaves a field untouched; for clearable
/// fields the inner option distinguishes "set" from "clear".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub dependency: Option<Option<TaskId>>,
    pub subtasks: Option<Vec<Subtask>>,
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn dependency(dependency: Option<TaskId>) -> Self {
        Self {
            dependency: Some(dependency),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.dependency.is_none()
            && self.subtasks.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

impl Task {
    pub fn new(draft: TaskDraft, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        check_date_range(draft.start_date, draft.end_date)?;
        Ok(Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            status: Status::Todo,
            priority: draft.priority,
            category: draft.category,
            dependency: draft.dependency,
            subtasks: vec![],
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Applies a patch, keeping `completed_at` in step with status
    /// transitions. The date range is validated against the would-be
    /// result before anything is written, so a rejected patch leaves the
    /// task untouched.
    pub fn apply_patch(
        &mut self,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let next_start = patch.start_date.unwrap_or(self.start_date);
        let next_end = patch.end_date.unwrap_or(self.end_date);
        check_date_range(next_start, next_end)?;

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(dependency) = patch.dependency {
            self.dependency = dependency;
        }
        if let Some(subtasks) = patch.subtasks {
            self.subtasks = subtasks;
        }
        self.start_date = next_start;
        self.end_date = next_end;

        if let Some(status) = patch.status {
            self.set_status(status, now);
        }

        self.updated_at = now;
        Ok(())
    }

    fn set_status(&mut self, status: Status, now: DateTime<Utc>) {
        if self.status == status {
            return;
        }
        self.completed_at = (status == Status::Completed).then_some(now);
        self.status = status;
    }

    pub fn add_subtask(&mut self, title: String, now: DateTime<Utc>) -> &Subtask {
        self.subtasks.push(Subtask {
            id: Uuid::new_v4(),
            title,
            completed: false,
            created_at: now,
        });
        self.updated_at = now;
        // Just pushed, so the list is non-empty.
        &self.subtasks[self.subtasks.len() - 1]
    }

    pub fn remove_subtask(&mut self, subtask_id: Uuid, now: DateTime<Utc>) -> bool {
        let before = self.subtasks.len();
        self.subtasks.retain(|s| s.id != subtask_id);
        let removed = self.subtasks.len() < before;
        if removed {
            self.updated_at = now;
        }
        removed
    }

    pub fn toggle_subtask(&mut self, subtask_id: Uuid, now: DateTime<Utc>) -> bool {
        let Some(subtask) = self.subtasks.iter_mut().find(|s| s.id == subtask_id) else {
            return false;
        };
        subtask.completed = !subtask.completed;
        self.updated_at = now;
        true
    }
}

fn check_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(ValidationError::DateRange { start, end });
    }
    Ok(())
}
