//! Output format value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for reconciliation reports
///
/// This is a domain concept representing how the report should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Counts plus every failed position (default)
    #[default]
    Summary,
    /// Every command with its terminal status
    Full,
    /// JSON output
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "full" => Ok(OutputFormat::Full),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Summary => "summary",
            OutputFormat::Full => "full",
            OutputFormat::Json => "json",
        };
        f.write_str(s)
    }
}
