//! Telegram Bot API channel
//!
//! Sends replies and greetings with `sendMessage` and receives commands
//! with `getUpdates` long polling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::{Channel, ChannelError, ChannelResult, Delivered};
use crate::config::TelegramConfig;

/// Bot API base URL
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Extra time allowed on top of the long-poll timeout
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

/// One incoming update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// An incoming chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram delivery channel
pub struct TelegramChannel {
    client: Client,
    api_base: String,
    token: String,
    poll_timeout: Duration,
}

impl TelegramChannel {
    /// Create a channel from configuration
    pub fn new(config: &TelegramConfig) -> ChannelResult<Self> {
        Self::with_base_url(
            &config.api_base,
            &config.bot_token,
            Duration::from_secs(config.poll_timeout_secs),
        )
    }

    /// Create a channel against a custom API base (used by tests)
    pub fn with_base_url(api_base: &str, token: &str, poll_timeout: Duration) -> ChannelResult<Self> {
        if token.trim().is_empty() {
            return Err(ChannelError::InvalidConfig("bot token is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .build()
            .map_err(|e| ChannelError::InvalidConfig(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
            poll_timeout,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
        method: &str,
    ) -> ChannelResult<T> {
        let status = response.status();
        let body = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            ChannelError::Unavailable(format!("{method}: HTTP {status}, undecodable body: {e}"))
        })?;

        if envelope.ok {
            if let Some(result) = envelope.result {
                return Ok(result);
            }
        }

        let description = envelope
            .description
            .unwrap_or_else(|| format!("HTTP {status}"));

        if status.as_u16() == 429 {
            let retry_after = envelope.parameters.and_then(|p| p.retry_after).unwrap_or(1);
            return Err(ChannelError::RateLimited(format!(
                "{description} (retry after {retry_after}s)"
            )));
        }
        if status.is_server_error() {
            return Err(ChannelError::Unavailable(description));
        }
        Err(ChannelError::Rejected(format!("{method}: {description}")))
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: Option<i64>) -> ChannelResult<Vec<Update>> {
        let mut params = vec![
            ("timeout", self.poll_timeout.as_secs().to_string()),
            ("allowed_updates", r#"["message"]"#.to_string()),
        ];
        if let Some(offset) = offset {
            params.push(("offset", offset.to_string()));
        }

        let response = self
            .client
            .get(self.method_url("getUpdates"))
            .query(&params)
            .send()
            .await?;

        Self::decode(response, "getUpdates").await
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, chat_id: &str, text: &str) -> ChannelResult<Delivered> {
        let payload = json!({
            "chat_id": chat_id,
            "text": text,
        });

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await?;

        match Self::decode::<SentMessage>(response, "sendMessage").await {
            Ok(sent) => {
                tracing::debug!(chat_id = %chat_id, message_id = sent.message_id, "Message delivered");
                Ok(Delivered {
                    chat_id: chat_id.to_string(),
                    message_id: sent.message_id,
                })
            }
            Err(e) => {
                tracing::error!(chat_id = %chat_id, error = %e, "Failed to deliver message");
                Err(e)
            }
        }
    }

    async fn health_check(&self) -> ChannelResult<bool> {
        let response = self.client.get(self.method_url("getMe")).send().await?;
        match Self::decode::<serde_json::Value>(response, "getMe").await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "Telegram health check failed");
                Ok(false)
            }
        }
    }
}
