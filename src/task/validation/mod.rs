//! Default admission validator.

use crate::task::domain::Task;
use crate::task::ports::{Admission, RejectionReason, TaskValidator, ValidatorResult};
use async_trait::async_trait;

/// Default implementation of the admission gate.
///
/// Accepts any candidate whose title is non-empty after trimming; everything
/// else is rejected with [`RejectionReason::EmptyTitle`]. Rejection is an
/// outcome, never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleValidator;

impl TitleValidator {
    /// Creates the default validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TaskValidator for TitleValidator {
    async fn validate(&self, candidate: &Task) -> ValidatorResult<Admission> {
        if candidate.title().trim().is_empty() {
            return Ok(Admission::Rejected(RejectionReason::EmptyTitle));
        }
        Ok(Admission::Accepted)
    }
}
