//! Chat delivery channels
//!
//! The bot only needs one operation from a chat transport: deliver a text
//! message to a chat. [`telegram`] implements it over the Bot API.

pub mod telegram;

use async_trait::async_trait;
use std::fmt;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors that can occur during channel operations
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid channel configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Channel temporarily unavailable
    #[error("Channel temporarily unavailable: {0}")]
    Unavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The chat API rejected the request
    #[error("Rejected by chat API: {0}")]
    Rejected(String),
}

/// A message the chat API accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub chat_id: String,
    pub message_id: i64,
}

impl fmt::Display for Delivered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message {} in chat {}", self.message_id, self.chat_id)
    }
}

/// Trait for chat delivery channels
#[async_trait]
pub trait Channel: Send + Sync {
    /// Get the channel name
    fn name(&self) -> &str;

    /// Send a plain-text message to a chat
    async fn send(&self, chat_id: &str, text: &str) -> ChannelResult<Delivered>;

    /// Check if the channel is available
    async fn health_check(&self) -> ChannelResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivered_display() {
        let delivered = Delivered {
            chat_id: "-100".to_string(),
            message_id: 17,
        };
        assert_eq!(delivered.to_string(), "message 17 in chat -100");
    }

    #[test]
    fn test_channel_error_display() {
        let err = ChannelError::RateLimited("Too Many Requests (retry after 7s)".to_string());
        assert!(err.to_string().starts_with("Rate limit exceeded"));
    }
}
