//! Dispatch parameters - worker pool and pacing control.
//!
//! [`DispatchParams`] groups the static parameters that control how
//! [`Dispatcher`](crate::use_cases::dispatch::Dispatcher) fans commands out
//! against the rate-limited endpoint.

use megaverse_domain::RetryPolicy;
use std::time::Duration;

/// Worker pool, pacing and retry parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchParams {
    /// Maximum number of commands in flight at once.
    pub concurrency_limit: usize,
    /// Minimum gap between two requests issued from the same worker slot.
    pub min_request_spacing: Option<Duration>,
    /// Retry policy applied around every create call (and the goal fetch).
    pub retry: RetryPolicy,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            concurrency_limit: 10,
            min_request_spacing: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl DispatchParams {
    // ==================== Builder Methods ====================

    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    pub fn with_min_request_spacing(mut self, spacing: Option<Duration>) -> Self {
        self.min_request_spacing = spacing;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Check parameters that would make a run impossible.
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency_limit == 0 {
            return Err("concurrency_limit must be at least 1".to_string());
        }
        if self.retry.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
