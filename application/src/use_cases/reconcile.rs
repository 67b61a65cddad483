//! Reconcile use case
//!
//! Fetches the goal map, turns every non-empty cell into a creation command
//! and drives the [`Dispatcher`] until each command has a terminal outcome.
//! Fetch and parse failures abort the run before anything is dispatched;
//! per-command failures never do.

use crate::config::DispatchParams;
use crate::ports::create_client::CreateClient;
use crate::ports::goal_source::{FetchError, GoalSource, RawGoal};
use crate::ports::progress::{NoProgress, ReconcileProgressNotifier};
use crate::use_cases::dispatch::{Dispatcher, sleep_unless_cancelled};
use megaverse_domain::{CreateCommand, GoalMap, GoalMapError, ReconciliationReport, RetryAction};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that abort a reconciliation run
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Failed to fetch goal map: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid goal map: {0}")]
    Parse(#[from] GoalMapError),

    #[error("Invalid dispatch parameters: {0}")]
    InvalidParams(String),
}

/// Input for the Reconcile use case
#[derive(Debug, Clone, Default)]
pub struct ReconcileInput {
    /// Extra passes over commands that did not succeed
    pub repair_passes: u32,
}

impl ReconcileInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repair_passes(mut self, passes: u32) -> Self {
        self.repair_passes = passes;
        self
    }
}

/// The parsed goal and the commands it implies
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    pub goal: GoalMap,
    pub commands: Vec<CreateCommand>,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct ReconcileOutput {
    pub plan: ReconcilePlan,
    pub report: ReconciliationReport,
    /// Dispatch passes actually run (1 + repair passes used)
    pub passes: u32,
}

/// Use case for reconciling the remote grid against the goal map
pub struct ReconcileUseCase<S: GoalSource + 'static, C: CreateClient + 'static> {
    source: Arc<S>,
    dispatcher: Dispatcher<C>,
    params: DispatchParams,
    cancel: CancellationToken,
}

impl<S: GoalSource + 'static, C: CreateClient + 'static> ReconcileUseCase<S, C> {
    pub fn new(source: Arc<S>, client: Arc<C>, params: DispatchParams) -> Self {
        let cancel = CancellationToken::new();
        Self {
            source,
            dispatcher: Dispatcher::new(client, params.clone()).with_cancellation(cancel.clone()),
            params,
            cancel,
        }
    }

    /// Share a cancellation token with the caller (e.g. a Ctrl-C handler).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.dispatcher = self.dispatcher.with_cancellation(cancel.clone());
        self.cancel = cancel;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: ReconcileInput) -> Result<ReconcileOutput, ReconcileError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: ReconcileInput,
        progress: &dyn ReconcileProgressNotifier,
    ) -> Result<ReconcileOutput, ReconcileError> {
        self.params
            .validate()
            .map_err(ReconcileError::InvalidParams)?;

        let plan = self.plan().await?;
        progress.on_goal_loaded(plan.goal.height(), plan.goal.width(), plan.commands.len());

        let mut report = self
            .dispatcher
            .run_with_progress(plan.commands.clone(), progress)
            .await;
        let mut passes = 1;

        while passes <= input.repair_passes
            && !report.is_complete_success()
            && !self.cancel.is_cancelled()
        {
            info!(
                "Repair pass {}: re-submitting {} commands",
                passes,
                report.failures().len()
            );
            let repaired = self.redispatch_with_progress(&report, progress).await;
            report.merge(repaired);
            passes += 1;
        }

        Ok(ReconcileOutput {
            plan,
            report,
            passes,
        })
    }

    /// Fetch and interpret the goal map without dispatching anything.
    pub async fn plan(&self) -> Result<ReconcilePlan, ReconcileError> {
        let raw = self.fetch_with_retry().await?;
        let goal = GoalMap::parse(&raw)?;
        let commands = goal.commands();
        info!(
            "Goal map is {}x{} with {} objects to create",
            goal.height(),
            goal.width(),
            commands.len()
        );
        Ok(ReconcilePlan { goal, commands })
    }

    /// Re-submit only the commands that did not succeed in `previous`.
    pub async fn redispatch(&self, previous: &ReconciliationReport) -> ReconciliationReport {
        self.redispatch_with_progress(previous, &NoProgress).await
    }

    pub async fn redispatch_with_progress(
        &self,
        previous: &ReconciliationReport,
        progress: &dyn ReconcileProgressNotifier,
    ) -> ReconciliationReport {
        self.dispatcher
            .run_with_progress(previous.retry_commands(), progress)
            .await
    }

    /// Fetch the goal, retrying transient and rate-limit failures under the
    /// same policy used for creation.
    async fn fetch_with_retry(&self) -> Result<RawGoal, ReconcileError> {
        let policy = &self.params.retry;
        let mut attempt = 1;
        loop {
            let err = match self.source.fetch_goal().await {
                Ok(raw) => return Ok(raw),
                Err(e) => e,
            };

            match policy.next_action(attempt, &err.attempt_result()) {
                RetryAction::Stop(_) => return Err(err.into()),
                RetryAction::WaitThen(delay) => {
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Goal fetch failed, retrying: {}",
                        err
                    );
                    if !sleep_unless_cancelled(delay, &self.cancel).await {
                        return Err(err.into());
                    }
                    attempt += 1;
                }
            }
        }
    }
}
