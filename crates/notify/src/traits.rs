//! Chat transport boundary and shared error types.

use adpulse_core::UserId;

/// Errors that can occur during message delivery.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("chat API error: {0}")]
    Api(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

/// Best-effort delivery of digest text to a user's chat.
///
/// No delivery guarantee beyond one attempt; retries, if any, belong to the
/// implementing adapter.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver one message (or chunk) to the given user.
    async fn send_message(&self, user_id: UserId, text: &str) -> Result<(), TransportError>;

    /// Human-readable name for this transport (e.g., "telegram").
    fn transport_name(&self) -> &str;
}
