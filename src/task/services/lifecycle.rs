//! Orchestration service for task admission, mutation, and queries.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::join_all;
use mockable::Clock;
use thiserror::Error;
use tracing::debug;

use crate::task::{
    domain::{DueDate, Priority, Task, TaskEvent, TaskId, TaskUpdate},
    notification::{LifecycleObserver, NotificationBus, ObserverHandle, ObserverResult},
    ports::{
        Admission, RejectionReason, TaskStore, TaskStoreError, TaskValidator, ValidatorError,
    },
};

/// Request payload for admitting a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTaskRequest {
    title: String,
    description: Option<String>,
    priority: Priority,
    due_date: Option<String>,
}

impl AddTaskRequest {
    /// Creates a request with the given title and medium priority.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            due_date: None,
        }
    }

    /// Sets an optional free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets raw due-date input; parsing happens during admission and
    /// unparseable input becomes the invalid-due-date sentinel, not a
    /// fault.
    #[must_use]
    pub fn with_due_date(mut self, raw: impl Into<String>) -> Self {
        self.due_date = Some(raw.into());
        self
    }
}

/// Service-level errors for lifecycle operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// The validator turned the candidate away; an expected business
    /// outcome surfaced to the immediate caller, never a system fault.
    #[error("task admission rejected: {reason}")]
    Rejected {
        /// Why the candidate was turned away.
        reason: RejectionReason,
    },

    /// The validation backend failed operationally.
    #[error(transparent)]
    Validator(#[from] ValidatorError),

    /// The task store refused the operation.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for lifecycle service operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Aggregate counters over both task collections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStats {
    /// Committed tasks across both collections.
    pub total: usize,
    /// Tasks in the completed collection.
    pub completed: usize,
    /// Tasks in the pending collection.
    pub pending: usize,
    /// Pending tasks with a valid due date strictly in the past.
    pub overdue: usize,
    /// Percentage of committed tasks that are completed; `0.0` for an
    /// empty store.
    pub completion_rate: f64,
}

/// Task lifecycle orchestration service.
///
/// Owns the store, the default notification bus, and the clock for its
/// lifetime; the validator is a stateless collaborator invoked once per
/// admission attempt. Clones share all of them, so the service can be
/// handed to concurrent callers cheaply.
pub struct LifecycleService<S, V, C>
where
    S: TaskStore,
    V: TaskValidator,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    validator: Arc<V>,
    clock: Arc<C>,
    bus: NotificationBus,
    // Serializes every mutation together with its notification so that one
    // task's events are published in causal order.
    mutation: Arc<Mutex<()>>,
}

impl<S, V, C> Clone for LifecycleService<S, V, C>
where
    S: TaskStore,
    V: TaskValidator,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            validator: Arc::clone(&self.validator),
            clock: Arc::clone(&self.clock),
            bus: self.bus.clone(),
            mutation: Arc::clone(&self.mutation),
        }
    }
}

impl<S, V, C> LifecycleService<S, V, C>
where
    S: TaskStore,
    V: TaskValidator,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service with an empty observer set.
    #[must_use]
    pub fn new(store: Arc<S>, validator: Arc<V>, clock: Arc<C>) -> Self {
        Self {
            store,
            validator,
            clock,
            bus: NotificationBus::new(),
            mutation: Arc::new(Mutex::new(())),
        }
    }

    /// Registers an observer for lifecycle events.
    ///
    /// See [`NotificationBus::subscribe`] for delivery guarantees.
    pub fn subscribe(&self, observer: Arc<dyn LifecycleObserver>) -> ObserverHandle {
        self.bus.subscribe(observer)
    }

    /// Registers a closure observer for lifecycle events.
    pub fn subscribe_fn<F>(&self, callback: F) -> ObserverHandle
    where
        F: Fn(TaskEvent, &Task) -> ObserverResult + Send + Sync + 'static,
    {
        self.bus.subscribe_fn(callback)
    }

    /// Removes a subscription; returns `false` for unknown handles.
    pub fn unsubscribe(&self, handle: ObserverHandle) -> bool {
        self.bus.unsubscribe(handle)
    }

    /// Admits a single task: reserve id, validate, commit, notify.
    ///
    /// The returned task is fully committed once this call resolves;
    /// admission is never fire-and-forget. A rejected candidate still
    /// consumes its reserved identifier permanently.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Rejected`] for a business rejection,
    /// [`LifecycleError::Validator`] when the validation backend fails, or
    /// [`LifecycleError::Store`] when the store refuses the insert.
    pub async fn add_task(&self, request: AddTaskRequest) -> LifecycleResult<Task> {
        let id = self.store.next_id();
        let AddTaskRequest {
            title,
            description,
            priority,
            due_date,
        } = request;
        let due = DueDate::parse(due_date.as_deref());
        let candidate = Task::new(id, title, description, priority, due, &*self.clock);

        match self.validator.validate(&candidate).await? {
            Admission::Rejected(reason) => {
                debug!(task_id = %id, %reason, "admission rejected");
                Err(LifecycleError::Rejected { reason })
            }
            Admission::Accepted => self.commit(candidate),
        }
    }

    /// Admits every candidate independently and concurrently.
    ///
    /// Results are positionally correlated with the input regardless of
    /// completion order, and one candidate's rejection or fault never
    /// aborts, delays, or corrupts the others.
    pub async fn bulk_add_tasks(
        &self,
        requests: Vec<AddTaskRequest>,
    ) -> Vec<LifecycleResult<Task>> {
        // join_all polls all admissions concurrently and yields results in
        // input order.
        join_all(requests.into_iter().map(|request| self.add_task(request))).await
    }

    /// Moves a pending task to the completed collection and publishes
    /// `taskCompleted`.
    ///
    /// Returns `Ok(None)` for unknown or already-completed identifiers;
    /// callers routinely probe, so this is not a fault and never duplicates
    /// the task in the completed collection.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when the store lock is poisoned.
    pub fn complete_task(&self, id: TaskId) -> LifecycleResult<Option<Task>> {
        let _guard = self.mutation_guard();
        let Some(task) = self.store.mark_completed(id, self.clock.utc())? else {
            return Ok(None);
        };
        self.bus.publish(TaskEvent::Completed, &task);
        Ok(Some(task))
    }

    /// Applies a whitelisted update to a pending task and publishes
    /// `taskUpdated`.
    ///
    /// Returns `Ok(None)` when no pending task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when the store lock is poisoned.
    pub fn update_task(&self, id: TaskId, update: &TaskUpdate) -> LifecycleResult<Option<Task>> {
        let _guard = self.mutation_guard();
        let Some(task) = self.store.update(id, update)? else {
            return Ok(None);
        };
        self.bus.publish(TaskEvent::Updated, &task);
        Ok(Some(task))
    }

    /// Returns pending tasks with a valid due date strictly before now,
    /// sorted ascending by due date with insertion order breaking ties.
    ///
    /// Tasks with an unset or invalid due date are excluded without being
    /// compared.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when the store lock is poisoned.
    pub fn overdue_tasks(&self) -> LifecycleResult<Vec<Task>> {
        let now = self.clock.utc();
        let mut overdue: Vec<Task> = self
            .store
            .snapshot_pending()?
            .into_iter()
            .filter(|task| task.is_overdue(now))
            .collect();
        // Stable sort keeps insertion order for equal due dates.
        overdue.sort_by_key(|task| task.due().due_at());
        Ok(overdue)
    }

    /// Returns pending tasks with the given priority, reflecting the store
    /// state at the moment of the call.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when the store lock is poisoned.
    pub fn tasks_by_priority(&self, priority: Priority) -> LifecycleResult<Vec<Task>> {
        Ok(self
            .store
            .snapshot_pending()?
            .into_iter()
            .filter(|task| task.priority() == priority)
            .collect())
    }

    /// Case-insensitive substring search over pending tasks' titles and
    /// descriptions; tasks without a description simply never match on
    /// that field.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when the store lock is poisoned.
    pub fn search_tasks(&self, query: &str) -> LifecycleResult<Vec<Task>> {
        Ok(self
            .store
            .snapshot_pending()?
            .into_iter()
            .filter(|task| task.matches_search(query))
            .collect())
    }

    /// Returns aggregate counters computed from one consistent partition
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Store`] when the store lock is poisoned.
    pub fn stats(&self) -> LifecycleResult<TaskStats> {
        let snapshot = self.store.snapshot()?;
        let now = self.clock.utc();
        let pending = snapshot.pending.len();
        let completed = snapshot.completed.len();
        let total = pending + completed;
        let overdue = snapshot
            .pending
            .iter()
            .filter(|task| task.is_overdue(now))
            .count();
        Ok(TaskStats {
            total,
            completed,
            pending,
            overdue,
            completion_rate: completion_rate(completed, total),
        })
    }

    /// Inserts and notifies without an intervening suspension point, so an
    /// abandoned admission future is either fully committed or absent.
    fn commit(&self, task: Task) -> LifecycleResult<Task> {
        let _guard = self.mutation_guard();
        self.store.insert_pending(task.clone())?;
        self.bus.publish(TaskEvent::Added, &task);
        Ok(task)
    }

    fn mutation_guard(&self) -> MutexGuard<'_, ()> {
        // The guard only enforces ordering; it carries no data, so a
        // poisoned lock is recoverable.
        self.mutation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "completion rate is a display percentage"
)]
fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}
