//! Per-fire digest pipeline.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use adpulse_analytics::{aggregate, compare, resolve, ComparisonKind};
use adpulse_core::{AccountRef, UserId};
use adpulse_notify::telegram::MESSAGE_LIMIT;
use adpulse_notify::{chunk, ChatTransport, DigestRenderer};
use adpulse_scheduler::FireHandler;

use crate::traits::{AccountDirectory, InsightsSource};

/// Runs the full digest pipeline for one user per fire event.
///
/// Accounts are processed sequentially: the ads API behind the insights
/// source is rate-limited, and unbounded concurrency would need a queue
/// this system deliberately doesn't have.
pub struct NotificationOrchestrator {
    insights: Arc<dyn InsightsSource>,
    accounts: Arc<dyn AccountDirectory>,
    transport: Arc<dyn ChatTransport>,
    renderer: DigestRenderer,
    chunk_limit: usize,
}

impl NotificationOrchestrator {
    pub fn new(
        insights: Arc<dyn InsightsSource>,
        accounts: Arc<dyn AccountDirectory>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            insights,
            accounts,
            transport,
            renderer: DigestRenderer::new(),
            chunk_limit: MESSAGE_LIMIT,
        }
    }

    /// Override the per-message chunk limit (defaults to the Telegram cap).
    pub fn with_chunk_limit(mut self, limit: usize) -> Self {
        self.chunk_limit = limit;
        self
    }

    /// Whether the account saw spend *and* conversions over the trailing
    /// 14 days. Either one at zero marks the account inactive and its
    /// digest is suppressed.
    async fn is_active(&self, account: &AccountRef, today: NaiveDate) -> anyhow::Result<bool> {
        let probe_window = resolve(ComparisonKind::BiweeklyVsMonthly, today).current;
        let records = self
            .insights
            .fetch_insights(&account.id, &probe_window)
            .await?;
        let probe = aggregate(&records, &probe_window, false)?;
        Ok(probe.spend > 0.0 && probe.conversions > 0.0)
    }

    /// One digest message covering every comparison kind for `account`.
    async fn build_digest(&self, account: &AccountRef, today: NaiveDate) -> anyhow::Result<String> {
        let mut sections = Vec::with_capacity(ComparisonKind::ALL.len());
        for kind in ComparisonKind::ALL {
            let windows = resolve(kind, today);
            let current_records = self
                .insights
                .fetch_insights(&account.id, &windows.current)
                .await?;
            let previous_records = self
                .insights
                .fetch_insights(&account.id, &windows.previous)
                .await?;
            let current = aggregate(&current_records, &windows.current, kind.normalized())?;
            let previous = aggregate(&previous_records, &windows.previous, kind.normalized())?;
            let result = compare(&current, &previous)?;
            sections.push(self.renderer.render(&result, &account.display_name, kind)?);
        }
        Ok(sections.join("\n\n"))
    }

    async fn process_account(
        &self,
        user_id: UserId,
        account: &AccountRef,
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        if !self.is_active(account, today).await? {
            info!(
                user_id,
                account_id = %account.id,
                reason = "inactive",
                "skipping account"
            );
            return Ok(());
        }

        let digest = self.build_digest(account, today).await?;
        let pieces = chunk(&digest, self.chunk_limit)?;
        for piece in &pieces {
            self.transport.send_message(user_id, piece).await?;
        }
        info!(
            user_id,
            account_id = %account.id,
            transport = self.transport.transport_name(),
            chunks = pieces.len(),
            "digest delivered"
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl FireHandler for NotificationOrchestrator {
    /// Process every account visible to `user_id`.
    ///
    /// A failure on one account (fetch, render, or delivery) is logged
    /// and skipped; the user simply receives no digest for that account
    /// this cycle. No partial message is ever sent.
    async fn on_fire(&self, user_id: UserId, today: NaiveDate) -> anyhow::Result<()> {
        let accounts = self.accounts.list_visible(user_id).await?;
        info!(user_id, accounts = accounts.len(), "digest fire");
        for account in &accounts {
            if let Err(e) = self.process_account(user_id, account, today).await {
                warn!(
                    user_id,
                    account_id = %account.id,
                    error = %e,
                    "account skipped this cycle"
                );
            }
        }
        Ok(())
    }
}
