//! Observer registration and lifecycle event fan-out.

mod bus;
mod observer;

pub use bus::{NotificationBus, ObserverHandle};
pub use observer::{LifecycleObserver, ObserverError, ObserverResult};
