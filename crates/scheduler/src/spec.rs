//! Per-user recurring job specification.

use serde::{Deserialize, Serialize};

use adpulse_core::UserId;

/// A user's schedule for automatic digest delivery.
///
/// One spec per user. Upserting a spec replaces any prior job for that
/// user; a disabled spec tears the job down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringJobSpec {
    pub user_id: UserId,
    /// Hour of day to fire, 0–23, in `timezone_name`.
    pub fire_hour: u8,
    /// Minute to fire, 0–59.
    pub fire_minute: u8,
    /// IANA timezone name (e.g., "Europe/Berlin").
    pub timezone_name: String,
    pub enabled: bool,
}

impl RecurringJobSpec {
    /// 6-field cron expression firing daily at `fire_hour:fire_minute`.
    ///
    /// The `cron` crate wants seconds first, so a zero field is prepended.
    pub(crate) fn cron_expression(&self) -> String {
        format!("0 {} {} * * *", self.fire_minute, self.fire_hour)
    }
}
