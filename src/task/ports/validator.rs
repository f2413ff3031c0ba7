//! Validator port for the asynchronous admission gate.

use crate::task::domain::Task;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Result type for validation operations.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// Outcome of an admission check.
///
/// Business rejection is a normal, representable outcome, distinct from an
/// operational fault of the validation backend; the admission pipeline
/// treats the two differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The candidate may be committed.
    Accepted,
    /// The candidate was turned away for a business reason.
    Rejected(RejectionReason),
}

/// Why a candidate was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The candidate's title is empty after trimming.
    EmptyTitle,
}

impl RejectionReason {
    /// Returns the caller-facing description.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyTitle => "title must not be empty",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational failures of a validation backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidatorError {
    /// The validation backend could not be reached.
    #[error("validation backend unavailable: {0}")]
    Unavailable(String),
}

/// Port for the asynchronous admission predicate.
///
/// Implementations should be stateless and thread-safe; the lifecycle
/// service invokes one validation per admission attempt and may run many
/// attempts concurrently during bulk admission.
#[async_trait]
pub trait TaskValidator: Send + Sync {
    /// Decides whether a candidate task may be admitted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorError`] only for operational faults; a business
    /// rejection is reported through [`Admission::Rejected`], never as an
    /// error.
    async fn validate(&self, candidate: &Task) -> ValidatorResult<Admission>;
}
