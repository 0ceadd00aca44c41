//! Settings-store boundary.
//!
//! The scheduler reads job specs from the store and writes nothing back;
//! durability across restarts is the store's responsibility.

use adpulse_core::UserId;

use crate::spec::RecurringJobSpec;

/// Error from the external settings store.
#[derive(Debug, thiserror::Error)]
#[error("settings store error: {0}")]
pub struct StoreError(pub String);

#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Whether the user is known to the system.
    async fn user_exists(&self, user_id: UserId) -> Result<bool, StoreError>;

    /// All currently enabled specs, for replay on process start.
    async fn enabled_specs(&self) -> Result<Vec<RecurringJobSpec>, StoreError>;
}
