//! Task lifecycle and attachment management for Teamsync.
//!
//! This module is the sole authority over task status changes and attachment
//! permissions: validating role-gated status transitions, applying their
//! comment side effects, and enforcing which attachment types each role may
//! upload, delete, or see at each point of the lifecycle. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
