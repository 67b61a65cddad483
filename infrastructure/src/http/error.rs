//! Error types for the HTTP adapter

use thiserror::Error;

/// Errors that can occur when building the HTTP adapter
#[derive(Error, Debug)]
pub enum HttpClientError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Candidate id must not be empty")]
    MissingCandidateId,

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
