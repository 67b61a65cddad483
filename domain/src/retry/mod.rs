//! Bounded retry with exponential backoff.
//!
//! [`RetryPolicy`] is generic over the *kind* of failure reported by one
//! attempt ([`AttemptResult`]), never over raw status codes. The same policy
//! drives object creation and the goal map fetch.
//!
//! # Example
//!
//! ```
//! use megaverse_domain::retry::{AttemptResult, RetryAction, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::new(5, Duration::from_secs(2));
//!
//! assert_eq!(
//!     policy.next_action(1, &AttemptResult::RateLimited),
//!     RetryAction::WaitThen(Duration::from_secs(2))
//! );
//! assert_eq!(
//!     policy.next_action(2, &AttemptResult::RateLimited),
//!     RetryAction::WaitThen(Duration::from_secs(4))
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a single network attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// The object was created.
    Success,
    /// Server error or connection failure; the same request may succeed later.
    TransientFailure(String),
    /// The shared rate budget is exhausted (HTTP 429).
    RateLimited,
    /// The request was rejected for cause; retrying cannot help.
    PermanentFailure(String),
}

impl AttemptResult {
    fn reason(&self) -> String {
        match self {
            AttemptResult::Success => "success".to_string(),
            AttemptResult::TransientFailure(reason) => reason.clone(),
            AttemptResult::RateLimited => "rate limited".to_string(),
            AttemptResult::PermanentFailure(reason) => reason.clone(),
        }
    }
}

/// Terminal status of one command after its retry loop ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FinalStatus {
    Succeeded,
    /// Rejected by the remote service; never retried.
    Rejected(String),
    /// Still failing after the last allowed attempt.
    Exhausted(String),
}

impl FinalStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FinalStatus::Succeeded)
    }
}

/// What the caller should do after an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryAction {
    Stop(FinalStatus),
    WaitThen(Duration),
}

/// Bounded retry policy with exponential backoff (multiplier 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Decide the next step given the 1-based number of the attempt that
    /// just finished and its result.
    pub fn next_action(&self, attempt: u32, result: &AttemptResult) -> RetryAction {
        match result {
            AttemptResult::Success => RetryAction::Stop(FinalStatus::Succeeded),
            AttemptResult::PermanentFailure(reason) => {
                RetryAction::Stop(FinalStatus::Rejected(reason.clone()))
            }
            AttemptResult::TransientFailure(_) | AttemptResult::RateLimited => {
                if attempt < self.max_attempts {
                    RetryAction::WaitThen(self.delay(attempt))
                } else {
                    RetryAction::Stop(FinalStatus::Exhausted(format!(
                        "{} after {} attempts",
                        result.reason(),
                        attempt
                    )))
                }
            }
        }
    }

    /// Backoff after the given 1-based attempt: `base_delay * 2^(attempt-1)`,
    /// capped at [`RetryPolicy::max_delay`].
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let multiplier = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(multiplier)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay())
    }

    /// Upper bound on any single delay: `base_delay * 2^(max_attempts-1)`.
    pub fn max_delay(&self) -> Duration {
        let exponent = self.max_attempts.saturating_sub(1);
        let multiplier = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(multiplier)
            .unwrap_or(Duration::MAX)
    }
}
