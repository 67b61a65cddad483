//! Domain layer for megaverse
//!
//! This crate contains the core reconciliation vocabulary: goal maps, cell
//! codes, creation commands, the retry policy and the run report.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Goal map
//!
//! The target grid fetched from the remote service. Each cell holds a code
//! (`EMPTY`, `POLYANET`, `RED_SOLOON`, `UP_COMETH`, ...) interpreted once into
//! a [`CellDescriptor`].
//!
//! ## Reconciliation
//!
//! Every non-empty cell becomes one [`CreateCommand`]. Commands are executed
//! under a [`RetryPolicy`] and their terminal outcomes are collected into a
//! [`ReconciliationReport`].

pub mod cell;
pub mod command;
pub mod config;
pub mod goal;
pub mod report;
pub mod retry;

// Re-export commonly used types
pub use cell::{CellDescriptor, ComethDirection, ParseError, SoloonColor};
pub use command::{CelestialObject, CreateCommand, Position};
pub use config::{ConfigIssue, OutputFormat, Severity};
pub use goal::{GoalMap, GoalMapError};
pub use report::{CommandReport, CommandStatus, ReconciliationReport};
pub use retry::{AttemptResult, FinalStatus, RetryAction, RetryPolicy};
