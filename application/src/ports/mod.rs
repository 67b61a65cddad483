//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod create_client;
pub mod goal_source;
pub mod progress;
