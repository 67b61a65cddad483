//! Use cases (application services)
//!
//! Use cases orchestrate domain logic and coordinate with ports.

pub mod dispatch;
pub mod reconcile;
