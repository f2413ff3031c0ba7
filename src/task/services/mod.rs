//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    AddTaskRequest, LifecycleError, LifecycleResult, LifecycleService, TaskStats,
};
