//! Thread-safe in-memory task store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::task::{
    domain::{Task, TaskId, TaskUpdate},
    ports::{StoreSnapshot, TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Identifier allocation is lock-free; collection mutations take a single
/// write lock, so the pending/completed partition can never be observed in
/// an intermediate state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    counter: Arc<AtomicU64>,
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    pending: Vec<Task>,
    completed: Vec<Task>,
}

impl StoreState {
    fn contains(&self, id: TaskId) -> bool {
        self.pending
            .iter()
            .chain(self.completed.iter())
            .any(|task| task.id() == id)
    }
}

impl InMemoryTaskStore {
    /// Creates an empty store; the first reserved identifier is `1`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn next_id(&self) -> TaskId {
        // fetch_add increments exactly once per caller, so ids are unique
        // and monotonic even across rejected admissions.
        TaskId::from_value(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn insert_pending(&self, task: Task) -> TaskStoreResult<()> {
        let mut state = self.state.write()?;
        if state.contains(task.id()) {
            return Err(TaskStoreError::DuplicateId(task.id()));
        }
        state.pending.push(task);
        Ok(())
    }

    fn mark_completed(
        &self,
        id: TaskId,
        completed_at: DateTime<Utc>,
    ) -> TaskStoreResult<Option<Task>> {
        let mut state = self.state.write()?;
        let Some(position) = state.pending.iter().position(|task| task.id() == id) else {
            return Ok(None);
        };
        // One write lock spans the whole move, keeping the partition atomic.
        let mut task = state.pending.remove(position);
        task.complete(completed_at);
        state.completed.push(task.clone());
        Ok(Some(task))
    }

    fn update(&self, id: TaskId, update: &TaskUpdate) -> TaskStoreResult<Option<Task>> {
        let mut state = self.state.write()?;
        let Some(task) = state.pending.iter_mut().find(|task| task.id() == id) else {
            return Ok(None);
        };
        task.apply_update(update);
        Ok(Some(task.clone()))
    }

    fn snapshot(&self) -> TaskStoreResult<StoreSnapshot> {
        let state = self.state.read()?;
        Ok(StoreSnapshot {
            pending: state.pending.clone(),
            completed: state.completed.clone(),
        })
    }
}
