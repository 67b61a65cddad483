//! CLI command definitions

use clap::{Parser, ValueEnum};
use megaverse_domain::OutputFormat as DomainOutputFormat;
use std::path::PathBuf;

/// Output format for the reconciliation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Counts plus every failed position
    Summary,
    /// Every command with its terminal status
    Full,
    /// JSON output
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => DomainOutputFormat::Summary,
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for megaverse
#[derive(Parser, Debug)]
#[command(name = "megaverse")]
#[command(author, version, about = "Reconcile a Megaverse goal map against the challenge API")]
#[command(long_about = r#"
Megaverse fetches the goal map for a candidate and creates every POLYanet,
SOLoon and comETH it describes, retrying rate-limited and transient failures
with exponential backoff.

Re-running is safe: creating an object that already exists is a no-op, so a
second run only repairs the cells that failed.

Configuration files are loaded from (in priority order):
1. MEGAVERSE_* environment variables
2. --config <path>      Explicit config file
3. ./megaverse.toml     Project-level config
4. ~/.config/megaverse/config.toml   Global config

Example:
  megaverse --candidate-id 91f84bce-...
  megaverse --cross 11 --concurrency 4
  megaverse --dry-run -o full
"#)]
pub struct Cli {
    /// Candidate id (overrides config and MEGAVERSE_CANDIDATE_ID)
    #[arg(long, value_name = "ID")]
    pub candidate_id: Option<String>,

    /// API root URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Maximum number of create calls in flight
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Attempts per object, including the first
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Backoff after the first failure in milliseconds (doubles per retry)
    #[arg(long, value_name = "MS")]
    pub base_delay_ms: Option<u64>,

    /// Minimum gap between requests from one worker in milliseconds
    #[arg(long, value_name = "MS")]
    pub min_request_spacing_ms: Option<u64>,

    /// Build a POLYanet cross of this size locally instead of fetching the goal
    #[arg(long, value_name = "SIZE")]
    pub cross: Option<usize>,

    /// Fetch and parse the goal map, print the commands, create nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Extra passes re-submitting commands that did not succeed
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub repair_passes: u32,

    /// Exit non-zero if any object could not be created
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Plain line-per-object progress instead of a progress bar
    #[arg(long)]
    pub plain: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "megaverse",
            "--candidate-id",
            "cand-1",
            "-j",
            "4",
            "--max-attempts",
            "3",
            "--cross",
            "11",
            "-o",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.candidate_id.as_deref(), Some("cand-1"));
        assert_eq!(cli.concurrency, Some(4));
        assert_eq!(cli.max_attempts, Some(3));
        assert_eq!(cli.cross, Some(11));
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.repair_passes, 0);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            DomainOutputFormat::from(OutputFormat::Full),
            DomainOutputFormat::Full
        );
    }
}
