//! Unified error handling for the hodimbot crate
//!
//! Domain errors stay in their modules ([`UpstreamError`], [`StorageError`],
//! [`ChannelError`], [`SchedulerError`]); [`Error`] wraps them for code that
//! crosses module boundaries, such as the birthday job and command handlers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hodimbot::error::{Error, ErrorCategory};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(category = ?err.category(), "Will retry on next trigger: {err}");
//!     } else {
//!         tracing::error!("Fatal error: {err}");
//!     }
//! }
//! ```

use thiserror::Error;

pub use crate::notifications::channels::ChannelError;
pub use crate::scheduler::error::SchedulerError;
pub use crate::storage::StorageError;
pub use crate::upstream::UpstreamError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Upstream HTTP errors (transport, timeout, status, payload)
    Network,
    /// Local file persistence errors
    Storage,
    /// Chat delivery errors
    Delivery,
    /// Configuration errors
    Config,
    /// Schedule and time zone errors
    Scheduler,
}

/// Unified error type for the hodimbot crate
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream API errors
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Persisted JSON errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Chat delivery errors
    #[error("Delivery error: {0}")]
    Channel(#[from] ChannelError),

    /// Schedule and time zone errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Category used for log fields and handling decisions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Upstream(_) => ErrorCategory::Network,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Channel(_) => ErrorCategory::Delivery,
            Self::Scheduler(_) => ErrorCategory::Scheduler,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// Whether a later attempt may succeed without operator action
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Upstream(UpstreamError::Status { status, .. }) => {
                *status == 429 || *status >= 500
            }
            Self::Upstream(UpstreamError::InvalidConfig(_)) => false,
            Self::Upstream(_) => true,
            Self::Storage(_) => true,
            Self::Channel(ChannelError::InvalidConfig(_)) => false,
            Self::Channel(_) => true,
            Self::Scheduler(e) => e.is_recoverable(),
            Self::Config(_) => false,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
