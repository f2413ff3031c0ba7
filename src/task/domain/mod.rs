//! Domain model for task lifecycle management.
//!
//! The task domain models candidate construction, the pending/completed
//! partition, due-date parsing, the update field whitelist, and the
//! lifecycle event vocabulary while keeping all infrastructure concerns
//! outside of the domain boundary.

mod due;
mod error;
mod event;
mod ids;
mod priority;
mod task;
mod update;

pub use due::DueDate;
pub use error::ParsePriorityError;
pub use event::TaskEvent;
pub use ids::TaskId;
pub use priority::Priority;
pub use task::Task;
pub use update::TaskUpdate;
