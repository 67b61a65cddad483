//! reqwest-backed adapter for the challenge API.
//!
//! Implements both [`GoalSource`] and [`CreateClient`]. Each call is a single
//! attempt; responses are classified into failure kinds here so the retry
//! policy never sees status codes.

use super::error::HttpClientError;
use super::payload::{CreatePayload, endpoint, parse_goal_body};
use async_trait::async_trait;
use megaverse_application::{CreateClient, FetchError, GoalSource, RawGoal};
use megaverse_domain::{AttemptResult, CreateCommand};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://challenge.crossmint.io/api";

/// Longest slice of a response body kept in failure reasons
const MAX_REASON_BODY: usize = 200;

/// Failure kind of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    RateLimited,
    Transient,
    Permanent,
}

/// Classify an HTTP status code.
///
/// 2xx succeeds, 429 is a rate limit, 5xx is transient, and everything else
/// (other 4xx, unexpected 1xx/3xx) is a permanent rejection.
pub fn classify_status(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Success
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        StatusClass::RateLimited
    } else if status.is_server_error() {
        StatusClass::Transient
    } else {
        StatusClass::Permanent
    }
}

/// Map a create response to an attempt result.
pub fn attempt_result(status: StatusCode, body: &str) -> AttemptResult {
    match classify_status(status) {
        StatusClass::Success => AttemptResult::Success,
        StatusClass::RateLimited => AttemptResult::RateLimited,
        StatusClass::Transient => AttemptResult::TransientFailure(describe(status, body)),
        StatusClass::Permanent => AttemptResult::PermanentFailure(describe(status, body)),
    }
}

fn describe(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status.to_string();
    }
    let cut = body
        .char_indices()
        .nth(MAX_REASON_BODY)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    format!("{}: {}", status, &body[..cut])
}

/// HTTP client bound to one candidate
#[derive(Debug, Clone)]
pub struct MegaverseHttpClient {
    http: reqwest::Client,
    base_url: String,
    candidate_id: String,
}

impl MegaverseHttpClient {
    pub fn new(
        base_url: &str,
        candidate_id: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, HttpClientError> {
        let candidate_id = candidate_id.into();
        if candidate_id.trim().is_empty() {
            return Err(HttpClientError::MissingCandidateId);
        }

        Url::parse(base_url).map_err(|e| HttpClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("megaverse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            candidate_id,
        })
    }

    pub fn goal_url(&self) -> String {
        format!("{}/map/{}/goal", self.base_url, self.candidate_id)
    }

    pub fn create_url(&self, command: &CreateCommand) -> String {
        format!("{}/{}", self.base_url, endpoint(&command.object))
    }
}

#[async_trait]
impl GoalSource for MegaverseHttpClient {
    async fn fetch_goal(&self) -> Result<RawGoal, FetchError> {
        let url = self.goal_url();
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        let status = response.status();
        // A connection dropped mid-body is a transport failure, not a bad map
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transient(format!("{}: {}", status, e)))?;

        match classify_status(status) {
            StatusClass::Success => parse_goal_body(&body),
            StatusClass::RateLimited => Err(FetchError::RateLimited),
            StatusClass::Transient => Err(FetchError::Transient(describe(status, &body))),
            StatusClass::Permanent => Err(FetchError::Rejected {
                status: status.as_u16(),
                reason: describe(status, &body),
            }),
        }
    }
}

#[async_trait]
impl CreateClient for MegaverseHttpClient {
    async fn create(&self, command: &CreateCommand) -> AttemptResult {
        let url = self.create_url(command);
        let payload = CreatePayload::new(&self.candidate_id, command);
        debug!("POST {} {:?}", url, payload);

        match self.http.post(&url).json(&payload).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return AttemptResult::Success;
                }
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        warn!(
                            "Failed to read {} response body for {}: {}",
                            status, command, e
                        );
                        String::new()
                    }
                };
                attempt_result(status, &body)
            }
            Err(e) => AttemptResult::TransientFailure(e.to_string()),
        }
    }
}
