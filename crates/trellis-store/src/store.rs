//! The single source of truth for the task collection, reconciled with
//! the remote backend.
//!
//! Mutation discipline: the cache only ever changes by merging a
//! server-confirmed record or by restoring a per-task pre-mutation
//! snapshot. Optimistic states are never blind-merged, so two mutations
//! in flight on different tasks cannot apply each other's rollback.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use trellis_core::dependency::validate_dependency;
use trellis_core::drag::DropMutation;
use trellis_core::error::ValidationError;
use trellis_core::task::{Status, Subtask, Task, TaskDraft, TaskId, TaskPatch};
use trellis_wire::{CreateBody, PatchBody};
use uuid::Uuid;

use crate::backend::{Backend, BackendError};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Rejected locally before any network call; no state changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The target id is no longer in the canonical set.
    #[error("task {0} is no longer present")]
    NotFound(TaskId),

    /// The remote call failed; the canonical set has been rolled back to
    /// its pre-mutation shape.
    #[error("remote mutation failed: {0}")]
    Mutation(#[source] BackendError),

    #[error("failed to fetch tasks: {0}")]
    Fetch(#[source] BackendError),
}

pub struct TaskStore<B: Backend> {
    backend: B,
    cache: Mutex<Vec<Task>>,
    stale: AtomicBool,
}

impl<B: Backend> TaskStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: Mutex::new(Vec::new()),
            stale: AtomicBool::new(true),
        }
    }

    /// The current cached set, possibly stale while a refresh is due.
    pub fn list(&self) -> Vec<Task> {
        self.cache.lock().clone()
    }

    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.cache.lock().iter().find(|t| t.id == id).cloned()
    }

    /// Marks the cached set as needing a refetch. The owner decides when
    /// to actually call [`TaskStore::refresh`].
    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::Release);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    /// Replaces the cache with the backend's current set. Every record
    /// is shape-validated at this boundary; one bad record fails the
    /// whole refresh rather than admitting an invalid task.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<Vec<Task>, StoreError> {
        let records = self
            .backend
            .fetch_tasks()
            .await
            .map_err(StoreError::Fetch)?;

        let mut tasks = Vec::with_capacity(records.len());
        for record in records {
            let task = record
                .into_task()
                .map_err(|err| StoreError::Fetch(BackendError::Decode(err)))?;
            tasks.push(task);
        }

        info!(count = tasks.len(), "refreshed canonical task set");
        *self.cache.lock() = tasks.clone();
        self.stale.store(false, Ordering::Release);
        Ok(tasks)
    }

    /// Creates a task (status `todo`). There is no optimistic insert: a
    /// failed create leaves the canonical set exactly as it was.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        if let (Some(start), Some(end)) = (draft.start_date, draft.end_date)
            && start > end
        {
            return Err(ValidationError::DateRange { start, end }.into());
        }
        if let Some(dependency) = draft.dependency
            && self.get(dependency).is_none()
        {
            return Err(StoreError::NotFound(dependency));
        }

        let record = self
            .backend
            .create_task(CreateBody::from_draft(&draft))
            .await
            .map_err(StoreError::Mutation)?;
        let task = record
            .into_task()
            .map_err(|err| StoreError::Mutation(BackendError::Decode(err)))?;

        debug!(task = %task.id, "task created");
        self.cache.lock().push(task.clone());
        Ok(task)
    }

    /// Applies a partial update. Dependency and date validation run
    /// synchronously before anything is dispatched; the patch is applied
    /// optimistically and rolled back to the pre-mutation snapshot if
    /// the remote call fails.
    #[instrument(skip(self, patch), fields(task = %id))]
    pub async fn update(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let now = Utc::now();

        let snapshot = {
            let cache = self.cache.lock();
            let task = cache
                .iter()
                .find(|t| t.id == id)
                .ok_or(StoreError::NotFound(id))?
                .clone();
            if let Some(dependency) = patch.dependency {
                // A candidate that left the canonical set (deleted
                // elsewhere) must not become a dangling edge.
                if let Some(candidate) = dependency
                    && !cache.iter().any(|t| t.id == candidate)
                {
                    return Err(StoreError::NotFound(candidate));
                }
                validate_dependency(&cache, id, dependency)?;
            }
            task
        };

        if patch.is_empty() {
            debug!(task = %id, "empty patch; nothing to dispatch");
            return Ok(snapshot);
        }

        let mut optimistic = snapshot.clone();
        optimistic.apply_patch(patch.clone(), now)?;
        self.replace(optimistic);

        let body = PatchBody::from_patch(&patch);
        match self.backend.update_task(id, body).await {
            Ok(record) => match record.into_task() {
                Ok(task) => {
                    self.replace(task.clone());
                    debug!(task = %id, "update confirmed");
                    Ok(task)
                }
                Err(err) => {
                    warn!(task = %id, error = %err, "confirmed record failed validation; rolling back");
                    self.replace(snapshot);
                    Err(StoreError::Mutation(BackendError::Decode(err)))
                }
            },
            Err(BackendError::NotFound(_)) => {
                // Deleted elsewhere: drop our copy instead of resurrecting it.
                warn!(task = %id, "task vanished on the backend during update");
                self.cache.lock().retain(|t| t.id != id);
                Err(StoreError::NotFound(id))
            }
            Err(err) => {
                warn!(task = %id, error = %err, "update failed; rolling back");
                self.replace(snapshot);
                Err(StoreError::Mutation(err))
            }
        }
    }

    /// Deletes a task. The caller is responsible for having confirmed
    /// the deletion with the user. A failed delete reinstates the task
    /// at its original position.
    #[instrument(skip(self), fields(task = %id))]
    pub async fn remove(&self, id: TaskId) -> Result<(), StoreError> {
        let (snapshot, position) = {
            let mut cache = self.cache.lock();
            let position = cache
                .iter()
                .position(|t| t.id == id)
                .ok_or(StoreError::NotFound(id))?;
            (cache.remove(position), position)
        };

        match self.backend.delete_task(id).await {
            Ok(()) => {
                debug!(task = %id, "task deleted");
                Ok(())
            }
            Err(BackendError::NotFound(_)) => {
                // Already gone remotely; keep it gone locally too.
                warn!(task = %id, "task was already deleted on the backend");
                Err(StoreError::NotFound(id))
            }
            Err(err) => {
                warn!(task = %id, error = %err, "delete failed; restoring task");
                let mut cache = self.cache.lock();
                let position = position.min(cache.len());
                cache.insert(position, snapshot);
                Err(StoreError::Mutation(err))
            }
        }
    }

    /// Flips completion. Status and the derived flag move together, in
    /// one mutation: completed tasks reopen as `todo`, everything else
    /// completes.
    #[instrument(skip(self), fields(task = %id))]
    pub async fn toggle_complete(&self, id: TaskId) -> Result<Task, StoreError> {
        let current = self.get(id).ok_or(StoreError::NotFound(id))?;
        let next = if current.is_completed() {
            Status::Todo
        } else {
            Status::Completed
        };
        self.update(id, TaskPatch::status(next)).await
    }

    /// Applies a completed drag gesture: exactly one status update for
    /// the dragged task. A drop back into the origin container is a
    /// no-op, never a mutation.
    #[instrument(skip(self), fields(task = %mutation.task))]
    pub async fn apply_drop(&self, mutation: DropMutation) -> Result<Task, StoreError> {
        if mutation.destination == mutation.origin {
            debug!(task = %mutation.task, "drop landed in its origin container");
            return self
                .get(mutation.task)
                .ok_or(StoreError::NotFound(mutation.task));
        }
        self.update(mutation.task, TaskPatch::status(mutation.destination))
            .await
    }

    pub async fn add_subtask(&self, id: TaskId, title: String) -> Result<Task, StoreError> {
        let task = self.get(id).ok_or(StoreError::NotFound(id))?;
        let mut subtasks = task.subtasks;
        subtasks.push(Subtask {
            id: Uuid::new_v4(),
            title,
            completed: false,
            created_at: Utc::now(),
        });
        self.update_subtasks(id, subtasks).await
    }

    pub async fn remove_subtask(&self, id: TaskId, subtask_id: Uuid) -> Result<Task, StoreError> {
        let task = self.get(id).ok_or(StoreError::NotFound(id))?;
        let mut subtasks = task.subtasks;
        let before = subtasks.len();
        subtasks.retain(|s| s.id != subtask_id);
        if subtasks.len() == before {
            return Err(StoreError::NotFound(subtask_id));
        }
        self.update_subtasks(id, subtasks).await
    }

    pub async fn toggle_subtask(&self, id: TaskId, subtask_id: Uuid) -> Result<Task, StoreError> {
        let task = self.get(id).ok_or(StoreError::NotFound(id))?;
        let mut subtasks = task.subtasks;
        let subtask = subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or(StoreError::NotFound(subtask_id))?;
        subtask.completed = !subtask.completed;
        self.update_subtasks(id, subtasks).await
    }

    async fn update_subtasks(&self, id: TaskId, subtasks: Vec<Subtask>) -> Result<Task, StoreError> {
        self.update(
            id,
            TaskPatch {
                subtasks: Some(subtasks),
                ..TaskPatch::default()
            },
        )
        .await
    }

    /// Swaps the cached copy of a task for `task`, keyed by id. A task
    /// that vanished in the meantime is not resurrected.
    fn replace(&self, task: Task) {
        let mut cache = self.cache.lock();
        if let Some(slot) = cache.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        }
    }
}
