//! Progress reporting for reconciliation runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use megaverse_application::ports::progress::ReconcileProgressNotifier;
use megaverse_domain::{CommandReport, CommandStatus, ReconciliationReport};
use std::sync::Mutex;

/// Reports dispatch progress with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn status_marker(outcome: &CommandReport) -> String {
        match outcome.status {
            CommandStatus::Succeeded => format!("{} {}", "v".green(), outcome.command),
            CommandStatus::Rejected { .. } => format!("{} {}", "x".red(), outcome.command),
            CommandStatus::Abandoned { .. } | CommandStatus::Cancelled => {
                format!("{} {}", "!".yellow(), outcome.command)
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconcileProgressNotifier for ProgressReporter {
    fn on_goal_loaded(&self, height: usize, width: usize, commands: usize) {
        eprintln!(
            "{} {}x{} goal map, {} objects",
            "->".cyan(),
            height,
            width,
            commands
        );
    }

    fn on_dispatch_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix("Creating");
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_command_complete(&self, outcome: &CommandReport) {
        if let Ok(bar) = self.bar.lock() {
            if let Some(pb) = bar.as_ref() {
                pb.set_message(Self::status_marker(outcome));
                pb.inc(1);
            }
        }
    }

    fn on_dispatch_complete(&self, report: &ReconciliationReport) {
        if let Some(pb) = self.bar.lock().ok().and_then(|mut bar| bar.take()) {
            pb.finish_with_message(format!(
                "{} ({} of {} created)",
                "done".green(),
                report.succeeded(),
                report.total()
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI), one line per object on stderr
pub struct SimpleProgress;

impl ReconcileProgressNotifier for SimpleProgress {
    fn on_goal_loaded(&self, height: usize, width: usize, commands: usize) {
        eprintln!(
            "{} {}x{} goal map, {} objects",
            "->".cyan(),
            height,
            width,
            commands
        );
    }

    fn on_dispatch_start(&self, total: usize) {
        eprintln!("{} {} ({} objects)", "->".cyan(), "Creating".bold(), total);
    }

    fn on_command_complete(&self, outcome: &CommandReport) {
        match outcome.status.reason() {
            Some(reason) => eprintln!("  {} - {}", ProgressReporter::status_marker(outcome), reason),
            None => eprintln!("  {}", ProgressReporter::status_marker(outcome)),
        }
    }

    fn on_dispatch_complete(&self, report: &ReconciliationReport) {
        eprintln!(
            "{} {} of {} created",
            "->".cyan(),
            report.succeeded(),
            report.total()
        );
    }
}
