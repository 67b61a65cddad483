//! Output formatter trait

use megaverse_domain::{CreateCommand, GoalMap, OutputFormat, ReconciliationReport};

/// Trait for formatting reconciliation results
pub trait OutputFormatter {
    /// Counts plus every failed position
    fn format_summary(&self, report: &ReconciliationReport) -> String;

    /// Every command with its terminal status
    fn format_full(&self, report: &ReconciliationReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &ReconciliationReport) -> String;

    /// Commands a run would issue (dry run)
    fn format_plan(&self, goal: &GoalMap, commands: &[CreateCommand]) -> String;

    /// Render in the requested format
    fn render(&self, format: OutputFormat, report: &ReconciliationReport) -> String {
        match format {
            OutputFormat::Summary => self.format_summary(report),
            OutputFormat::Full => self.format_full(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
