//! Application-level configuration.
//!
//! - [`DispatchParams`] - worker pool size, request pacing and retry policy

pub mod dispatch_params;

pub use dispatch_params::DispatchParams;
