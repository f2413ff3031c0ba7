//! Task lifecycle management for Taskledger.
//!
//! This module implements the admission pipeline (create, validate, commit,
//! notify), the mutation operations (complete, update), the snapshot-based
//! read queries, and the bulk-admission protocol with per-item failure
//! isolation. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Default admission validation in [`validation`]
//! - Observer registration and event fan-out in [`notification`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod notification;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
