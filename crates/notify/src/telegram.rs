//! Telegram Bot API transport.
//!
//! Delivers digest chunks via the `sendMessage` endpoint. The digest text
//! carries HTML markup, so the adapter defaults to HTML parse mode and
//! handles Telegram's rate-limit responses.

use adpulse_core::UserId;

use crate::traits::{ChatTransport, TransportError};

/// Telegram's maximum message length in characters; the digest chunker
/// splits at this boundary.
pub const MESSAGE_LIMIT: usize = 4096;

/// Sends digest messages through the Telegram Bot API.
#[derive(Debug)]
pub struct TelegramTransport {
    bot_token: String,
    parse_mode: String,
    client: reqwest::Client,
}

impl TelegramTransport {
    /// Creates a new `TelegramTransport` from configuration values.
    ///
    /// If `bot_token` starts with `${`, the value between `${` and `}` is
    /// resolved as an environment variable name. Returns
    /// [`TransportError::Config`] if the token is empty or the env var is
    /// missing. `parse_mode` defaults to `"HTML"`, the mode the digest
    /// renderer emits.
    pub fn from_config(
        bot_token: String,
        parse_mode: Option<String>,
    ) -> Result<Self, TransportError> {
        let resolved_token = if bot_token.starts_with("${") {
            let var_name = bot_token
                .strip_prefix("${")
                .and_then(|s| s.strip_suffix('}'))
                .ok_or_else(|| {
                    TransportError::Config(format!("Malformed env var reference: {bot_token}"))
                })?;
            std::env::var(var_name).map_err(|_| {
                TransportError::Config(format!("Environment variable '{var_name}' is not set"))
            })?
        } else {
            bot_token
        };

        if resolved_token.is_empty() {
            return Err(TransportError::Config(
                "Telegram bot token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            bot_token: resolved_token,
            parse_mode: parse_mode.unwrap_or_else(|| "HTML".to_string()),
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl ChatTransport for TelegramTransport {
    /// Sends one chunk via the Telegram `sendMessage` API.
    async fn send_message(&self, user_id: UserId, text: &str) -> Result<(), TransportError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let body = serde_json::json!({
            "chat_id": user_id,
            "text": text,
            "parse_mode": self.parse_mode,
        });

        tracing::debug!(
            user_id,
            parse_mode = %self.parse_mode,
            chars = text.chars().count(),
            "Sending Telegram message"
        );

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        let resp_body: serde_json::Value = response.json().await?;

        if resp_body.get("ok") == Some(&serde_json::Value::Bool(true)) {
            tracing::info!(user_id, "Telegram message sent");
            return Ok(());
        }

        // Handle rate limiting (HTTP 429).
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp_body
                .get("parameters")
                .and_then(|p| p.get("retry_after"))
                .and_then(|v| v.as_u64())
                .unwrap_or(30);
            return Err(TransportError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let description = resp_body
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown Telegram API error");

        Err(TransportError::Api(format!(
            "Telegram API error: {description}"
        )))
    }

    fn transport_name(&self) -> &str {
        "telegram"
    }
}
