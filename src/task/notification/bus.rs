//! Fan-out registry for lifecycle events.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::observer::{FnObserver, LifecycleObserver, ObserverResult};
use crate::task::domain::{Task, TaskEvent};

/// Opaque handle identifying one subscription.
///
/// Removal goes through the same handle that registration returned; handles
/// are never reused within one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

/// Fan-out registry delivering lifecycle events to subscribers.
///
/// Cloning the bus shares the underlying registry, so a clone held by the
/// lifecycle service and a clone held by a presentation layer see the same
/// subscriber set.
#[derive(Clone, Default)]
pub struct NotificationBus {
    registry: Arc<Mutex<Registry>>,
}

#[derive(Default)]
struct Registry {
    next_handle: u64,
    observers: Vec<(ObserverHandle, Arc<dyn LifecycleObserver>)>,
}

impl NotificationBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and returns its removal handle.
    ///
    /// Delivery order follows subscription order. Callbacks run on the
    /// publisher's call stack and must not re-enter mutating lifecycle
    /// operations. Long-lived subscribers (a UI layer, say) should release
    /// their handle on teardown via [`NotificationBus::unsubscribe`]; the
    /// bus never expires subscriptions on its own.
    pub fn subscribe(&self, observer: Arc<dyn LifecycleObserver>) -> ObserverHandle {
        let mut registry = self.lock();
        registry.next_handle += 1;
        let handle = ObserverHandle(registry.next_handle);
        registry.observers.push((handle, observer));
        debug!(handle = handle.0, "observer subscribed");
        handle
    }

    /// Registers a closure observer; see [`NotificationBus::subscribe`].
    pub fn subscribe_fn<F>(&self, callback: F) -> ObserverHandle
    where
        F: Fn(TaskEvent, &Task) -> ObserverResult + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver(callback)))
    }

    /// Removes the subscription identified by `handle`.
    ///
    /// Returns `false` when the handle was already removed or never issued.
    pub fn unsubscribe(&self, handle: ObserverHandle) -> bool {
        let mut registry = self.lock();
        let before = registry.observers.len();
        registry.observers.retain(|(existing, _)| *existing != handle);
        registry.observers.len() != before
    }

    /// Returns the number of currently registered observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// Delivers `event` with a task snapshot to every subscriber.
    ///
    /// The subscriber list is snapshotted at call start, so registrations
    /// racing with an in-flight publish may miss that event but never
    /// receive it twice. A faulting observer is logged and skipped; the
    /// remaining observers still run and the publisher never sees the
    /// fault.
    pub fn publish(&self, event: TaskEvent, task: &Task) {
        let snapshot: Vec<_> = self.lock().observers.clone();
        for (handle, observer) in snapshot {
            if let Err(fault) = observer.on_event(event, task) {
                warn!(
                    handle = handle.0,
                    %event,
                    task_id = %task.id(),
                    %fault,
                    "observer fault contained",
                );
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // A poisoned registry only means an observer panicked while the
        // lock was held; the subscriber list itself remains usable.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
