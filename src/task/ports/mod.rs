//! Port contracts for the task context.

pub mod store;
pub mod validator;

pub use store::{StoreSnapshot, TaskStore, TaskStoreError, TaskStoreResult};
pub use validator::{
    Admission, RejectionReason, TaskValidator, ValidatorError, ValidatorResult,
};
