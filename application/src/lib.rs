//! Application layer for megaverse
//!
//! This crate contains the reconciliation use case, the dispatcher, port
//! definitions and dispatch configuration. It depends only on the domain
//! layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DispatchParams;
pub use ports::{
    create_client::CreateClient,
    goal_source::{FetchError, GoalSource, RawGoal, StaticGoalSource},
    progress::{NoProgress, ReconcileProgressNotifier},
};
pub use use_cases::dispatch::{Dispatcher, RequestPacer, execute_command};
pub use use_cases::reconcile::{
    ReconcileError, ReconcileInput, ReconcileOutput, ReconcilePlan, ReconcileUseCase,
};
