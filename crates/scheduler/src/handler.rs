//! Fire-event callback boundary.

use chrono::NaiveDate;

use adpulse_core::UserId;

/// Receives fire events from the scheduler.
///
/// `today` is the fire date in the job's configured timezone. A returned
/// error (or a panic) is caught and logged by the scheduler and never
/// deregisters the job; the next scheduled fire still happens.
#[async_trait::async_trait]
pub trait FireHandler: Send + Sync + 'static {
    async fn on_fire(&self, user_id: UserId, today: NaiveDate) -> anyhow::Result<()>;
}
