//! Dispatch configuration from TOML (`[dispatch]` and `[retry]` sections)

use megaverse_application::DispatchParams;
use megaverse_domain::{ConfigIssue, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw worker pool configuration from TOML
///
/// # Example
///
/// ```toml
/// [dispatch]
/// concurrency_limit = 10
/// min_request_spacing_ms = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDispatchConfig {
    /// Maximum commands in flight
    pub concurrency_limit: usize,
    /// Minimum gap between requests from one worker slot
    pub min_request_spacing_ms: Option<u64>,
}

impl Default for FileDispatchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 10,
            min_request_spacing_ms: None,
        }
    }
}

/// Raw retry configuration from TOML
///
/// # Example
///
/// ```toml
/// [retry]
/// max_attempts = 5
/// base_delay_ms = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Attempts per command, including the first
    pub max_attempts: u32,
    /// Backoff after the first failure; doubles on each retry
    pub base_delay_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 2000,
        }
    }
}

impl FileRetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }
}

impl FileDispatchConfig {
    /// Combine with the retry section into application dispatch parameters.
    pub fn to_params(&self, retry: &FileRetryConfig) -> DispatchParams {
        DispatchParams::default()
            .with_concurrency_limit(self.concurrency_limit)
            .with_min_request_spacing(self.min_request_spacing_ms.map(Duration::from_millis))
            .with_retry(retry.to_policy())
    }

    pub fn validate(&self, retry: &FileRetryConfig) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.concurrency_limit == 0 {
            issues.push(ConfigIssue::error(
                "dispatch.concurrency_limit",
                "must be at least 1",
            ));
        }
        if retry.max_attempts == 0 {
            issues.push(ConfigIssue::error("retry.max_attempts", "must be at least 1"));
        }
        if retry.base_delay_ms == 0 && retry.max_attempts > 1 {
            issues.push(ConfigIssue::warning(
                "retry.base_delay_ms",
                "retries will be issued back to back with no backoff",
            ));
        }
        issues
    }
}
