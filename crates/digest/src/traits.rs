//! Ads-data and account-visibility boundaries.

use adpulse_core::{AccountRef, DateRange, RawInsightRecord, UserId};

/// Operational failures from the ads data source.
///
/// Every variant means "skip this account for this fire": the orchestrator
/// logs it and moves on. Nothing is retried within a fire; the next
/// scheduled fire tries again.
#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    #[error("rate limited by the ads API")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("access token expired")]
    AuthExpired,

    #[error("transient network error: {0}")]
    TransientNetwork(String),
}

/// Raw per-day insight data for one account.
#[async_trait::async_trait]
pub trait InsightsSource: Send + Sync {
    /// Records for `account_id` over an inclusive day range.
    async fn fetch_insights(
        &self,
        account_id: &str,
        range: &DateRange,
    ) -> Result<Vec<RawInsightRecord>, InsightsError>;
}

/// Error from the account visibility source.
#[derive(Debug, thiserror::Error)]
#[error("account directory error: {0}")]
pub struct DirectoryError(pub String);

/// Which accounts a user may see.
#[async_trait::async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn list_visible(&self, user_id: UserId) -> Result<Vec<AccountRef>, DirectoryError>;
}
