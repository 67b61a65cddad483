//! Goal map - the target grid a reconciliation run converges on.

pub mod entities;

pub use entities::{GoalMap, GoalMapError};
