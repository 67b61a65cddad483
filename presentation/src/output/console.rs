//! Console output formatter for reconciliation reports

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use megaverse_domain::{
    CommandReport, CommandStatus, CreateCommand, GoalMap, ReconciliationReport,
};
use serde_json::json;

/// Formats reconciliation reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Counts plus every failed position and its reason
    pub fn format_summary(report: &ReconciliationReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Megaverse Reconciliation"));
        output.push('\n');
        output.push_str(&Self::counts(report));

        let failures = report.failures();
        if !failures.is_empty() {
            output.push_str(&Self::section_header("Not created"));
            for outcome in failures {
                output.push_str(&Self::outcome_line(outcome));
                output.push('\n');
            }
            output.push_str(&format!(
                "\n{}\n",
                "Re-run to repair only the missing cells.".dimmed()
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Every command, sorted by position
    pub fn format_full(report: &ReconciliationReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Megaverse Reconciliation"));
        output.push('\n');
        output.push_str(&Self::counts(report));

        output.push_str(&Self::section_header("Objects"));
        for outcome in report.outcomes() {
            output.push_str(&Self::outcome_line(outcome));
            output.push('\n');
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &ReconciliationReport) -> String {
        let value = json!({
            "total": report.total(),
            "succeeded": report.succeeded(),
            "rejected": report.rejected(),
            "abandoned": report.abandoned(),
            "cancelled": report.cancelled(),
            "attempts": report.attempts(),
            "outcomes": report.outcomes(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Commands a run would issue
    pub fn format_plan(goal: &GoalMap, commands: &[CreateCommand]) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}x{} goal map, {} objects to create\n",
            "Dry run:".cyan().bold(),
            goal.height(),
            goal.width(),
            commands.len()
        ));
        for command in commands {
            output.push_str(&format!("  {}\n", command));
        }
        output
    }

    fn counts(report: &ReconciliationReport) -> String {
        let mut output = format!(
            "{} {}   {} {}   {} {}   {} {}\n",
            "Total:".cyan().bold(),
            report.total(),
            "Created:".green().bold(),
            report.succeeded(),
            "Rejected:".red().bold(),
            report.rejected(),
            "Abandoned:".yellow().bold(),
            report.abandoned(),
        );
        if report.cancelled() > 0 {
            output.push_str(&format!(
                "{} {}\n",
                "Cancelled:".yellow().bold(),
                report.cancelled()
            ));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Network attempts:".dimmed(),
            report.attempts()
        ));
        output
    }

    fn outcome_line(outcome: &CommandReport) -> String {
        let marker = match outcome.status {
            CommandStatus::Succeeded => "v".green(),
            CommandStatus::Rejected { .. } => "x".red(),
            CommandStatus::Abandoned { .. } | CommandStatus::Cancelled => "!".yellow(),
        };
        let mut line = format!(
            "  {} {:<10} {} ({} attempt{})",
            marker,
            outcome.position().to_string(),
            outcome.command.object,
            outcome.attempts,
            if outcome.attempts == 1 { "" } else { "s" }
        );
        match outcome.status.reason() {
            Some(reason) => line.push_str(&format!(
                " {} {}",
                outcome.status.label().dimmed(),
                reason
            )),
            None if !outcome.status.is_success() => {
                line.push_str(&format!(" {}", outcome.status.label().dimmed()))
            }
            None => {}
        }
        line
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_summary(&self, report: &ReconciliationReport) -> String {
        Self::format_summary(report)
    }

    fn format_full(&self, report: &ReconciliationReport) -> String {
        Self::format_full(report)
    }

    fn format_json(&self, report: &ReconciliationReport) -> String {
        Self::format_json(report)
    }

    fn format_plan(&self, goal: &GoalMap, commands: &[CreateCommand]) -> String {
        Self::format_plan(goal, commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use megaverse_domain::{FinalStatus, OutputFormat, SoloonColor};

    fn sample() -> ReconciliationReport {
        let mut report = ReconciliationReport::new();
        report.record(CommandReport::new(
            CreateCommand::polyanet(0, 1),
            FinalStatus::Succeeded,
            1,
        ));
        report.record(CommandReport::new(
            CreateCommand::soloon(1, 0, SoloonColor::Red),
            FinalStatus::Rejected("400 Bad Request".to_string()),
            1,
        ));
        report.record(CommandReport::new(
            CreateCommand::polyanet(2, 2),
            FinalStatus::Exhausted("rate limited after 5 attempts".to_string()),
            5,
        ));
        report
    }

    #[test]
    fn test_summary_lists_every_failure() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_summary(&sample());
        assert!(output.contains("Total: 3"));
        assert!(output.contains("Created: 1"));
        assert!(output.contains("(1, 0)"));
        assert!(output.contains("400 Bad Request"));
        assert!(output.contains("(2, 2)"));
        assert!(output.contains("rate limited after 5 attempts"));
        assert!(!output.contains("(0, 1)"));
    }

    #[test]
    fn test_full_lists_successes_too() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_full(&sample());
        assert!(output.contains("(0, 1)"));
        assert!(output.contains("red soloon"));
    }

    #[test]
    fn test_json_counts() {
        let output = ConsoleFormatter::format_json(&sample());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["rejected"], 1);
        assert_eq!(value["abandoned"], 1);
        assert_eq!(value["attempts"], 7);
        assert_eq!(value["outcomes"][0]["status"], "succeeded");
    }

    #[test]
    fn test_plan() {
        colored::control::set_override(false);
        let goal = GoalMap::polyanet_cross(5);
        let output = ConsoleFormatter::format_plan(&goal, &goal.commands());
        assert!(output.contains("5x5 goal map, 1 objects to create"));
        assert!(output.contains("polyanet at (2, 2)"));
    }

    #[test]
    fn test_render_dispatches_on_format() {
        colored::control::set_override(false);
        let formatter: &dyn OutputFormatter = &ConsoleFormatter;
        let report = sample();

        let json = formatter.render(OutputFormat::Json, &report);
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());

        let summary = formatter.render(OutputFormat::Summary, &report);
        assert!(!summary.contains("(0, 1)"));

        let full = formatter.render(OutputFormat::Full, &report);
        assert!(full.contains("(0, 1)"));
    }
}
