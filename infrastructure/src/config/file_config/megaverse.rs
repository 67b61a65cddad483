//! Remote API configuration from TOML (`[megaverse]` section)

use crate::http::DEFAULT_BASE_URL;
use megaverse_domain::ConfigIssue;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw remote API configuration from TOML
///
/// # Example
///
/// ```toml
/// [megaverse]
/// candidate_id = "91f84bce-0000-0000-0000-000000000000"
/// base_url = "https://challenge.crossmint.io/api"
/// request_timeout_secs = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMegaverseConfig {
    /// Candidate id used in every request (required)
    pub candidate_id: Option<String>,
    /// API root
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for FileMegaverseConfig {
    fn default() -> Self {
        Self {
            candidate_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl FileMegaverseConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        match self.candidate_id.as_deref().map(str::trim) {
            None => issues.push(ConfigIssue::error(
                "megaverse.candidate_id",
                "candidate id is required (set it in config, MEGAVERSE_CANDIDATE_ID or --candidate-id)",
            )),
            Some("") => issues.push(ConfigIssue::error(
                "megaverse.candidate_id",
                "candidate id must not be empty",
            )),
            Some(_) => {}
        }

        if let Err(e) = Url::parse(&self.base_url) {
            issues.push(ConfigIssue::error(
                "megaverse.base_url",
                format!("'{}' is not a valid URL: {}", self.base_url, e),
            ));
        }

        if self.request_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                "megaverse.request_timeout_secs",
                "must be at least 1",
            ));
        }

        issues
    }
}
