//! Update field whitelist.

use super::{DueDate, Priority};
use serde::{Deserialize, Serialize};

/// Whitelisted mutable fields for a pending task.
///
/// The update surface is this fixed, enumerated field set rather than an
/// open-ended key/value merge, so a structural mutation outside the
/// whitelist is unrepresentable by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    title: Option<String>,
    priority: Option<Priority>,
    due: Option<DueDate>,
}

impl TaskUpdate {
    /// Creates an empty update that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets a new due date from raw caller input.
    ///
    /// Unparseable input becomes the [`DueDate::Invalid`] sentinel, exactly
    /// as it would during admission.
    #[must_use]
    pub fn with_due_date(mut self, raw: &str) -> Self {
        self.due = Some(DueDate::parse(Some(raw)));
        self
    }

    /// Returns `true` when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.priority.is_none() && self.due.is_none()
    }

    /// Returns the replacement title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the replacement priority, if any.
    #[must_use]
    pub const fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the replacement due date, if any.
    #[must_use]
    pub const fn due(&self) -> Option<&DueDate> {
        self.due.as_ref()
    }
}
