//! Infrastructure layer for megaverse
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileDispatchConfig, FileMegaverseConfig, FileOutputConfig,
    FileRetryConfig,
};
pub use http::{DEFAULT_BASE_URL, HttpClientError, MegaverseHttpClient};
