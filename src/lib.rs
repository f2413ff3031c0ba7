//! Taskledger: in-memory task lifecycle core.
//!
//! This crate admits new tasks through an asynchronous validation gate,
//! mutates task state (complete, update), and broadcasts every state change
//! to a dynamic set of observers. Bulk admission runs candidates
//! concurrently with per-item failure isolation.
//!
//! # Architecture
//!
//! Taskledger follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory store)
//!
//! # Modules
//!
//! - [`task`]: Task admission, lifecycle tracking, and notification fan-out

pub mod task;
