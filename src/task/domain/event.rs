//! Lifecycle event vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle event published after a successful state change.
///
/// Events concerning one task are delivered in causal order: `Added`
/// strictly before any `Completed` or `Updated` for the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskEvent {
    /// A task passed admission and was committed to the pending collection.
    #[serde(rename = "taskAdded")]
    Added,
    /// A pending task moved to the completed collection.
    #[serde(rename = "taskCompleted")]
    Completed,
    /// Whitelisted fields of a pending task were modified.
    #[serde(rename = "taskUpdated")]
    Updated,
}

impl TaskEvent {
    /// Returns the canonical event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "taskAdded",
            Self::Completed => "taskCompleted",
            Self::Updated => "taskUpdated",
        }
    }
}

impl fmt::Display for TaskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
