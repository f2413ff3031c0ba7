//! Store port owning the authoritative pending and completed collections.

use crate::task::domain::{Task, TaskId, TaskUpdate};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Point-in-time copy of both collections, taken under a single lock so the
/// pending/completed partition is observed consistently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Pending tasks in insertion order.
    pub pending: Vec<Task>,
    /// Completed tasks in completion order.
    pub completed: Vec<Task>,
}

/// Contract for the authoritative task collections.
///
/// Implementations serialize every mutation against every other mutation
/// and never suspend; the admission pipeline's only suspension point is
/// validation.
pub trait TaskStore: Send + Sync {
    /// Reserves a fresh unique identifier.
    ///
    /// Safe under concurrent callers: no two callers ever observe the same
    /// value, and identifiers are never recycled.
    fn next_id(&self) -> TaskId;

    /// Adds an admitted task to the pending collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateId`] when the identifier already
    /// exists in either collection; this signals an id-allocation bug
    /// rather than a condition callers are expected to handle.
    fn insert_pending(&self, task: Task) -> TaskStoreResult<()>;

    /// Moves a pending task to the completed collection, stamping
    /// `completed_at` on the way.
    ///
    /// Returns `Ok(None)` for unknown or already-completed identifiers;
    /// callers routinely probe for existence, so this is not a fault. The
    /// move is atomic: no concurrent snapshot can observe the task in both
    /// collections or in neither.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when a collection lock was
    /// poisoned by a panicking writer.
    fn mark_completed(
        &self,
        id: TaskId,
        completed_at: DateTime<Utc>,
    ) -> TaskStoreResult<Option<Task>>;

    /// Applies the whitelisted fields of `update` to a pending task.
    ///
    /// Returns `Ok(None)` when no pending task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when a collection lock was
    /// poisoned by a panicking writer.
    fn update(&self, id: TaskId, update: &TaskUpdate) -> TaskStoreResult<Option<Task>>;

    /// Returns a point-in-time copy of both collections.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Poisoned`] when a collection lock was
    /// poisoned by a panicking writer.
    fn snapshot(&self) -> TaskStoreResult<StoreSnapshot>;

    /// Returns a point-in-time copy of the pending collection.
    ///
    /// # Errors
    ///
    /// Propagates the error from [`TaskStore::snapshot`].
    fn snapshot_pending(&self) -> TaskStoreResult<Vec<Task>> {
        Ok(self.snapshot()?.pending)
    }

    /// Returns a point-in-time copy of the completed collection.
    ///
    /// # Errors
    ///
    /// Propagates the error from [`TaskStore::snapshot`].
    fn snapshot_completed(&self) -> TaskStoreResult<Vec<Task>> {
        Ok(self.snapshot()?.completed)
    }
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateId(TaskId),

    /// A collection lock was poisoned by a panicking writer.
    #[error("task store lock poisoned")]
    Poisoned,
}

impl<T> From<std::sync::PoisonError<T>> for TaskStoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
