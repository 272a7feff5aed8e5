//! hodimbot - HEMIS employee directory bot
//!
//! Mirrors a university's HEMIS employee list into a local cache and serves
//! it to a Telegram chat: paged per-type listings, free-text search and a
//! once-a-day birthday greeting.
//!
//! # Architecture
//!
//! - [`upstream`] - HEMIS REST client and paginated aggregation
//! - [`storage`] - atomic JSON persistence, cache freshness, notification state
//! - [`directory`] - listings, search and birthday matching over the cache
//! - [`notifications`] - the daily birthday job and chat delivery channels
//! - [`scheduler`] - cron-like daily trigger
//! - [`bot`] - chat command parsing, execution and long polling
//! - [`app`] - component wiring from [`config::Config`]
//!
//! # Example
//!
//! ```no_run
//! use hodimbot::app::App;
//! use hodimbot::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::new(Config::from_env()?)?;
//!     println!("{}", app.directory.list("teacher", Some("1")).await?);
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "uz");

pub mod app;
pub mod bot;
pub mod config;
pub mod directory;
pub mod error;
pub mod i18n;
pub mod models;
pub mod notifications;
pub mod scheduler;
pub mod storage;
pub mod upstream;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::App;
    pub use crate::config::Config;
    pub use crate::directory::Directory;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{CacheSnapshot, Employee, EmployeeKinds, NotificationState};
    pub use crate::notifications::{BirthdayJob, Channel, JobOutcome};
    pub use crate::storage::{CacheStore, StateStore};
    pub use crate::upstream::{EmployeeSource, HemisClient};
}

// Direct re-exports for convenience
pub use models::{CacheSnapshot, Employee};
