//! Task aggregate root.

use super::{DueDate, Priority, TaskId, TaskUpdate};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// A task is constructed as a candidate with a reserved identifier, admitted
/// by a validator, and thereafter lives in exactly one of the pending or
/// completed collections of a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    priority: Priority,
    due: DueDate,
    completed: bool,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a candidate task with a reserved identifier.
    ///
    /// The candidate is not yet committed; its title may be empty at this
    /// stage, since admission validation happens afterwards.
    #[must_use]
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: Option<String>,
        priority: Priority,
        due: DueDate,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description,
            priority,
            due,
            completed: false,
            created_at: clock.utc(),
            completed_at: None,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the optional task description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due(&self) -> &DueDate {
        &self.due
    }

    /// Returns `true` once the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, set exactly once on completion.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Marks the task completed and stamps the completion time.
    ///
    /// Has no effect when the task is already completed, so the completion
    /// timestamp is written at most once.
    pub fn complete(&mut self, completed_at: DateTime<Utc>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.completed_at = Some(completed_at);
    }

    /// Applies the whitelisted fields of `update`.
    ///
    /// Only title, priority, and due date can ever change; the update type
    /// cannot express any other mutation.
    pub fn apply_update(&mut self, update: &TaskUpdate) {
        if let Some(title) = update.title() {
            self.title = title.to_owned();
        }
        if let Some(priority) = update.priority() {
            self.priority = priority;
        }
        if let Some(due) = update.due() {
            self.due = due.clone();
        }
    }

    /// Returns `true` when the task is not completed and its due date is a
    /// concrete instant strictly before `now`.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due.is_overdue(now)
    }

    /// Case-insensitive substring match against title and, when present,
    /// description. An absent description simply never matches.
    #[must_use]
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
    }
}
