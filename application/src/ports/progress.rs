//! Progress notification port
//!
//! Defines the interface for reporting progress during reconciliation.

use megaverse_domain::{CommandReport, ReconciliationReport};

/// Callback for progress updates during a reconciliation run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain lines, ...).
pub trait ReconcileProgressNotifier: Send + Sync {
    /// Called once the goal map has been parsed
    fn on_goal_loaded(&self, _height: usize, _width: usize, _commands: usize) {}

    /// Called when a dispatch pass starts
    fn on_dispatch_start(&self, total: usize);

    /// Called exactly once per command when it reaches a terminal status
    fn on_command_complete(&self, outcome: &CommandReport);

    /// Called when a dispatch pass completes
    fn on_dispatch_complete(&self, report: &ReconciliationReport);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ReconcileProgressNotifier for NoProgress {
    fn on_dispatch_start(&self, _total: usize) {}
    fn on_command_complete(&self, _outcome: &CommandReport) {}
    fn on_dispatch_complete(&self, _report: &ReconciliationReport) {}
}
