//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod dispatch;
mod megaverse;
mod output;

pub use dispatch::{FileDispatchConfig, FileRetryConfig};
pub use megaverse::FileMegaverseConfig;
pub use output::FileOutputConfig;

use megaverse_application::DispatchParams;
use megaverse_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Remote API settings
    pub megaverse: FileMegaverseConfig,
    /// Worker pool settings
    pub dispatch: FileDispatchConfig,
    /// Retry and backoff settings
    pub retry: FileRetryConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.megaverse.validate();
        issues.extend(self.dispatch.validate(&self.retry));
        issues
    }

    pub fn dispatch_params(&self) -> DispatchParams {
        self.dispatch.to_params(&self.retry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use megaverse_domain::OutputFormat;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[megaverse]
candidate_id = "cand-1"
base_url = "http://localhost:8080/api"
request_timeout_secs = 5

[dispatch]
concurrency_limit = 4
min_request_spacing_ms = 750

[retry]
max_attempts = 3
base_delay_ms = 500

[output]
format = "full"
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.megaverse.candidate_id.as_deref(), Some("cand-1"));
        assert_eq!(config.megaverse.base_url, "http://localhost:8080/api");
        assert_eq!(config.megaverse.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.dispatch.concurrency_limit, 4);
        assert_eq!(config.dispatch.min_request_spacing_ms, Some(750));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[dispatch]
concurrency_limit = 2
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dispatch.concurrency_limit, 2);
        // Defaults should apply
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 2000);
        assert!(config.output.color);
    }

    #[test]
    fn test_default_dispatch_params() {
        let params = FileConfig::default().dispatch_params();
        assert_eq!(params.concurrency_limit, 10);
        assert_eq!(params.retry.max_attempts, 5);
        assert_eq!(params.retry.base_delay, Duration::from_secs(2));
        assert!(params.min_request_spacing.is_none());
    }

    #[test]
    fn test_validate_requires_candidate_id() {
        let issues = FileConfig::default().validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "megaverse.candidate_id");
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_validate_bad_url() {
        let mut config = FileConfig::default();
        config.megaverse.candidate_id = Some("cand-1".into());
        config.megaverse.base_url = "::nope".into();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.field == "megaverse.base_url"));
    }
}
