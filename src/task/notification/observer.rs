//! Subscriber contract for lifecycle events.

use crate::task::domain::{Task, TaskEvent};
use thiserror::Error;

/// Result type for observer callbacks.
pub type ObserverResult = Result<(), ObserverError>;

/// Failure raised by a subscriber callback during delivery.
///
/// Faults are contained by the bus: they are logged, never propagated to
/// the publisher, and never prevent delivery to remaining subscribers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("observer fault: {0}")]
pub struct ObserverError(String);

impl ObserverError {
    /// Creates an observer fault with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Subscriber callback for task lifecycle events.
pub trait LifecycleObserver: Send + Sync {
    /// Handles one published lifecycle event with a snapshot of the task.
    ///
    /// # Errors
    ///
    /// A returned [`ObserverError`] is logged and contained by the bus.
    fn on_event(&self, event: TaskEvent, task: &Task) -> ObserverResult;
}

/// Adapter turning a closure into a [`LifecycleObserver`].
pub(crate) struct FnObserver<F>(pub(crate) F);

impl<F> LifecycleObserver for FnObserver<F>
where
    F: Fn(TaskEvent, &Task) -> ObserverResult + Send + Sync,
{
    fn on_event(&self, event: TaskEvent, task: &Task) -> ObserverResult {
        (self.0)(event, task)
    }
}
