//! Goal source port
//!
//! Defines where the goal map comes from.

use async_trait::async_trait;
use megaverse_domain::{AttemptResult, GoalMap};
use thiserror::Error;

/// Raw goal matrix as received: rows of cell codes.
pub type RawGoal = Vec<Vec<String>>;

/// Errors that can occur while retrieving the goal map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transient fetch failure: {0}")]
    Transient(String),

    #[error("rate limited while fetching goal map")]
    RateLimited,

    #[error("goal map request rejected ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("malformed goal map response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Failure kind as seen by the retry policy.
    pub fn attempt_result(&self) -> AttemptResult {
        match self {
            FetchError::Transient(reason) => AttemptResult::TransientFailure(reason.clone()),
            FetchError::RateLimited => AttemptResult::RateLimited,
            FetchError::Rejected { .. } | FetchError::Malformed(_) => {
                AttemptResult::PermanentFailure(self.to_string())
            }
        }
    }
}

/// Source of the goal map for a reconciliation run
#[async_trait]
pub trait GoalSource: Send + Sync {
    /// Retrieve the raw goal matrix (one attempt).
    async fn fetch_goal(&self) -> Result<RawGoal, FetchError>;
}

/// Goal source backed by a map built locally (e.g. the POLYanet cross).
pub struct StaticGoalSource {
    codes: RawGoal,
}

impl StaticGoalSource {
    pub fn new(map: &GoalMap) -> Self {
        Self {
            codes: map.to_codes(),
        }
    }
}

#[async_trait]
impl GoalSource for StaticGoalSource {
    async fn fetch_goal(&self) -> Result<RawGoal, FetchError> {
        Ok(self.codes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_result_kinds() {
        assert!(matches!(
            FetchError::Transient("502".into()).attempt_result(),
            AttemptResult::TransientFailure(_)
        ));
        assert_eq!(
            FetchError::RateLimited.attempt_result(),
            AttemptResult::RateLimited
        );
        assert!(matches!(
            FetchError::Malformed("missing field `goal`".into()).attempt_result(),
            AttemptResult::PermanentFailure(_)
        ));
        assert!(matches!(
            FetchError::Rejected {
                status: 404,
                reason: "Not Found".into()
            }
            .attempt_result(),
            AttemptResult::PermanentFailure(_)
        ));
    }

    #[tokio::test]
    async fn test_static_source_returns_codes() {
        let source = StaticGoalSource::new(&GoalMap::polyanet_cross(5));
        let raw = source.fetch_goal().await.unwrap();
        assert_eq!(raw.len(), 5);
        assert_eq!(raw[2][2], "POLYANET");
        assert_eq!(raw[0][0], "EMPTY");
    }
}
