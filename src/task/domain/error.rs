//! Error types for task domain parsing.

use thiserror::Error;

/// Error returned while parsing priority input from callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);
