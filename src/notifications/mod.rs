//! Outgoing notifications
//!
//! ```text
//! ┌──────────────────────────────┐
//! │         BirthdayJob          │
//! │  - already-sent gate         │
//! │  - cache refresh             │
//! │  - birthday matching         │
//! │  - lastSentDate bookkeeping  │
//! └──────────────────────────────┘
//!               │
//!               ▼
//!        ┌─────────────┐
//!        │   Channel   │
//!        │ (Telegram)  │
//!        └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use hodimbot::notifications::BirthdayJob;
//!
//! let job = BirthdayJob::new(cache, state, channel, chrono_tz::Asia::Tashkent);
//! let outcome = job.run().await?;
//! tracing::info!(%outcome, "done");
//! ```

pub mod birthday;
pub mod channels;

// Re-exports
pub use birthday::{BirthdayJob, JobOutcome};
pub use channels::telegram::TelegramChannel;
pub use channels::{Channel, ChannelError, Delivered};
