//! Reconciliation report - the auditable outcome of a run.
//!
//! One [`CommandReport`] is recorded per command, exactly once. The report
//! lists every failure with its position and reason so a later run can
//! re-submit only the missing cells.

use crate::command::{CreateCommand, Position};
use crate::retry::FinalStatus;
use serde::{Deserialize, Serialize};

/// Terminal status of a command within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandStatus {
    Succeeded,
    /// Rejected by the remote service (4xx other than 429).
    Rejected { reason: String },
    /// Gave up after the last allowed attempt.
    Abandoned { reason: String },
    /// The run was cancelled before this command finished.
    Cancelled,
}

impl CommandStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandStatus::Succeeded)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            CommandStatus::Rejected { reason } | CommandStatus::Abandoned { reason } => {
                Some(reason)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CommandStatus::Succeeded => "succeeded",
            CommandStatus::Rejected { .. } => "rejected",
            CommandStatus::Abandoned { .. } => "abandoned",
            CommandStatus::Cancelled => "cancelled",
        }
    }
}

impl From<FinalStatus> for CommandStatus {
    fn from(status: FinalStatus) -> Self {
        match status {
            FinalStatus::Succeeded => CommandStatus::Succeeded,
            FinalStatus::Rejected(reason) => CommandStatus::Rejected { reason },
            FinalStatus::Exhausted(reason) => CommandStatus::Abandoned { reason },
        }
    }
}

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReport {
    pub command: CreateCommand,
    #[serde(flatten)]
    pub status: CommandStatus,
    /// Network attempts made for this command.
    pub attempts: u32,
}

impl CommandReport {
    pub fn new(command: CreateCommand, status: impl Into<CommandStatus>, attempts: u32) -> Self {
        Self {
            command,
            status: status.into(),
            attempts,
        }
    }

    pub fn position(&self) -> Position {
        self.command.position
    }
}

/// Aggregate outcome of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    outcomes: Vec<CommandReport>,
}

impl ReconciliationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a terminal outcome.
    pub fn record(&mut self, outcome: CommandReport) {
        self.outcomes.push(outcome);
    }

    /// All outcomes, sorted by position.
    pub fn outcomes(&self) -> Vec<&CommandReport> {
        let mut outcomes: Vec<_> = self.outcomes.iter().collect();
        outcomes.sort_by_key(|o| o.position());
        outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| s.is_success())
    }

    pub fn rejected(&self) -> usize {
        self.count(|s| matches!(s, CommandStatus::Rejected { .. }))
    }

    pub fn abandoned(&self) -> usize {
        self.count(|s| matches!(s, CommandStatus::Abandoned { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|s| matches!(s, CommandStatus::Cancelled))
    }

    /// Total network attempts across all commands.
    pub fn attempts(&self) -> u64 {
        self.outcomes.iter().map(|o| u64::from(o.attempts)).sum()
    }

    /// Outcomes that did not succeed, sorted by position.
    pub fn failures(&self) -> Vec<&CommandReport> {
        self.outcomes()
            .into_iter()
            .filter(|o| !o.status.is_success())
            .collect()
    }

    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_success())
    }

    /// Commands worth submitting again: everything that did not succeed.
    pub fn retry_commands(&self) -> Vec<CreateCommand> {
        self.failures().into_iter().map(|o| o.command).collect()
    }

    /// Fold a later run over a subset of commands into this report.
    ///
    /// Outcomes in `later` replace the ones recorded for the same position;
    /// attempt counts accumulate.
    pub fn merge(&mut self, later: ReconciliationReport) {
        for outcome in later.outcomes {
            match self
                .outcomes
                .iter_mut()
                .find(|o| o.position() == outcome.position())
            {
                Some(existing) => {
                    existing.attempts = existing.attempts.saturating_add(outcome.attempts);
                    existing.command = outcome.command;
                    existing.status = outcome.status;
                }
                None => self.outcomes.push(outcome),
            }
        }
    }

    fn count(&self, pred: impl Fn(&CommandStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::SoloonColor;

    fn sample() -> ReconciliationReport {
        let mut report = ReconciliationReport::new();
        report.record(CommandReport::new(
            CreateCommand::polyanet(2, 2),
            FinalStatus::Succeeded,
            1,
        ));
        report.record(CommandReport::new(
            CreateCommand::soloon(0, 1, SoloonColor::Blue),
            FinalStatus::Rejected("400 Bad Request".to_string()),
            1,
        ));
        report.record(CommandReport::new(
            CreateCommand::polyanet(1, 1),
            FinalStatus::Exhausted("rate limited after 5 attempts".to_string()),
            5,
        ));
        report.record(CommandReport::new(
            CreateCommand::polyanet(3, 3),
            CommandStatus::Cancelled,
            0,
        ));
        report
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.rejected(), 1);
        assert_eq!(report.abandoned(), 1);
        assert_eq!(report.cancelled(), 1);
        assert_eq!(report.attempts(), 7);
        assert!(!report.is_complete_success());
    }

    #[test]
    fn test_failures_sorted_by_position() {
        let report = sample();
        let positions: Vec<_> = report.failures().iter().map(|o| o.position()).collect();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(1, 1), Position::new(3, 3)]
        );
        assert_eq!(report.retry_commands().len(), 3);
    }

    #[test]
    fn test_merge_replaces_by_position() {
        let mut report = sample();
        let mut repair = ReconciliationReport::new();
        repair.record(CommandReport::new(
            CreateCommand::polyanet(1, 1),
            FinalStatus::Succeeded,
            2,
        ));
        report.merge(repair);

        assert_eq!(report.total(), 4);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.abandoned(), 0);
        let merged = report
            .outcomes()
            .into_iter()
            .find(|o| o.position() == Position::new(1, 1))
            .unwrap();
        assert_eq!(merged.attempts, 7);
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = ReconciliationReport::new();
        assert_eq!(report.total(), 0);
        assert!(report.is_complete_success());
    }

    #[test]
    fn test_serialize_outcome() {
        let outcome = CommandReport::new(
            CreateCommand::polyanet(0, 1),
            FinalStatus::Rejected("400".to_string()),
            1,
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["reason"], "400");
        assert_eq!(json["command"]["position"]["row"], 0);
        assert_eq!(json["command"]["object"]["kind"], "polyanet");
    }
}
