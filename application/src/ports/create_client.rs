//! Create client port
//!
//! Defines the single-attempt capability for creating an object remotely.

use async_trait::async_trait;
use megaverse_domain::{AttemptResult, CreateCommand};

/// Performs one network creation call for a command.
///
/// Implementations classify the response into an [`AttemptResult`]:
///
/// | Response                       | Result              |
/// |--------------------------------|---------------------|
/// | 2xx                            | `Success`           |
/// | 429                            | `RateLimited`       |
/// | 5xx, connection failure        | `TransientFailure`  |
/// | other 4xx                      | `PermanentFailure`  |
///
/// Retrying is not the client's concern; see
/// [`Dispatcher`](crate::use_cases::dispatch::Dispatcher).
#[async_trait]
pub trait CreateClient: Send + Sync {
    async fn create(&self, command: &CreateCommand) -> AttemptResult;
}
