//! Fire-time orchestration of the digest pipeline.
//!
//! At each fire event the [`NotificationOrchestrator`] resolves which
//! accounts the user may see, runs period resolution → fetch → aggregation
//! → comparison → rendering per account, and delivers the chunked result
//! through the chat transport. One account's failure never blocks the
//! rest.

pub mod orchestrator;
pub mod traits;

pub use orchestrator::NotificationOrchestrator;
pub use traits::{AccountDirectory, DirectoryError, InsightsError, InsightsSource};
