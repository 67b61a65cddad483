//! Request and response bodies for the challenge API.

use megaverse_application::{FetchError, RawGoal};
use megaverse_domain::{CelestialObject, ComethDirection, CreateCommand, SoloonColor};
use serde::{Deserialize, Serialize};

/// Body of `POST /polyanets`, `/soloons` and `/comeths`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayload<'a> {
    pub candidate_id: &'a str,
    pub row: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<SoloonColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<ComethDirection>,
}

impl<'a> CreatePayload<'a> {
    pub fn new(candidate_id: &'a str, command: &CreateCommand) -> Self {
        let (color, direction) = match command.object {
            CelestialObject::Polyanet => (None, None),
            CelestialObject::Soloon { color } => (Some(color), None),
            CelestialObject::Cometh { direction } => (None, Some(direction)),
        };
        Self {
            candidate_id,
            row: command.position.row,
            column: command.position.column,
            color,
            direction,
        }
    }
}

/// Collection path for an object kind.
pub fn endpoint(object: &CelestialObject) -> &'static str {
    match object {
        CelestialObject::Polyanet => "polyanets",
        CelestialObject::Soloon { .. } => "soloons",
        CelestialObject::Cometh { .. } => "comeths",
    }
}

/// Body of `GET /map/{candidate_id}/goal`.
#[derive(Debug, Deserialize)]
struct GoalResponse {
    goal: RawGoal,
}

/// Extract the goal matrix from a response body.
pub fn parse_goal_body(body: &str) -> Result<RawGoal, FetchError> {
    serde_json::from_str::<GoalResponse>(body)
        .map(|r| r.goal)
        .map_err(|e| FetchError::Malformed(e.to_string()))
}
