//! Daily scheduling of the birthday job
//!
//! ```text
//!   CRON_TIME "M H * * *" + TZ
//!              │
//!       ┌──────▼───────┐
//!       │DailySchedule │ next_after(now, tz)
//!       └──────┬───────┘
//!              │
//!     ┌────────▼────────┐        ┌─────────────┐
//!     │ BirthdayTrigger │ ─────▶ │ BirthdayJob │
//!     └─────────────────┘        └─────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use hodimbot::scheduler::{BirthdayTrigger, DailySchedule};
//!
//! let schedule = DailySchedule::parse("0 9 * * *")?;
//! let trigger = BirthdayTrigger::new(job, schedule, chrono_tz::Asia::Tashkent);
//! trigger.start(shutdown_rx).await?;
//! ```

pub mod error;
pub mod trigger;

pub use error::{SchedulerError, SchedulerResult};
pub use trigger::{BirthdayTrigger, DailySchedule};
