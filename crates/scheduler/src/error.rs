use adpulse_core::UserId;
use thiserror::Error;

use crate::store::StoreError;

/// Errors from job scheduling operations.
///
/// All variants surface synchronously to the caller and are never retried
/// by the scheduler itself.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid fire time {hour:02}:{minute:02}")]
    InvalidFireTime { hour: u8, minute: u8 },

    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    #[error("no job installed for user {0}")]
    JobNotFound(UserId),

    #[error("scheduler is shut down")]
    ShutDown,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("fire failed: {0}")]
    FireFailed(String),
}
