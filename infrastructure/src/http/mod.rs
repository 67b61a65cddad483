//! HTTP adapter for the Megaverse challenge API
//!
//! - `GET  {base}/map/{candidate_id}/goal` - goal matrix
//! - `POST {base}/polyanets | /soloons | /comeths` - create one object

pub mod client;
pub mod error;
pub mod payload;

pub use client::{DEFAULT_BASE_URL, MegaverseHttpClient, StatusClass, classify_status};
pub use error::HttpClientError;
