//! Daily birthday notification job

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::channels::Channel;
use crate::directory::birthday::{local_date, todays_birthdays, MAX_GREETINGS};
use crate::error::Result;
use crate::storage::{CacheStore, StateStore};

/// What one job invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Today's message already went out
    AlreadySent { date: String },
    /// No chat is configured; nothing was sent or recorded
    NoTarget,
    /// No cached record carries a usable birth date
    FieldMissing { date: String },
    /// Birth dates exist but nobody was born today
    NobodyToday { date: String },
    /// Greetings were sent
    Greeted {
        date: String,
        celebrants: usize,
        listed: usize,
    },
}

impl JobOutcome {
    /// Whether this run sent a message
    pub fn delivered(&self) -> bool {
        matches!(
            self,
            Self::FieldMissing { .. } | Self::NobodyToday { .. } | Self::Greeted { .. }
        )
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySent { date } => write!(f, "already sent for {date}"),
            Self::NoTarget => write!(f, "no target chat configured"),
            Self::FieldMissing { date } => write!(f, "birth date field missing ({date})"),
            Self::NobodyToday { date } => write!(f, "no birthdays on {date}"),
            Self::Greeted {
                date,
                celebrants,
                listed,
            } => write!(f, "greeted {listed} of {celebrants} on {date}"),
        }
    }
}

/// Sends at most one birthday summary per local calendar day
///
/// Runs are serialized so a scheduled firing and a manual `/run` cannot
/// both pass the already-sent check. `lastSentDate` is written only after
/// the message is delivered.
pub struct BirthdayJob {
    cache: Arc<CacheStore>,
    state: Arc<StateStore>,
    channel: Arc<dyn Channel>,
    timezone: Tz,
    run_lock: Mutex<()>,
}

impl BirthdayJob {
    pub fn new(
        cache: Arc<CacheStore>,
        state: Arc<StateStore>,
        channel: Arc<dyn Channel>,
        timezone: Tz,
    ) -> Self {
        Self {
            cache,
            state,
            channel,
            timezone,
            run_lock: Mutex::new(()),
        }
    }

    /// Run for the current instant
    pub async fn run(&self) -> Result<JobOutcome> {
        self.run_at(Utc::now()).await
    }

    /// Run as if the clock read `now`
    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<JobOutcome> {
        let _guard = self.run_lock.lock().await;

        let today = local_date(now, self.timezone);
        let state = self.state.load().await;

        if state.last_sent_date == today {
            tracing::info!(date = %today, "Birthday message already sent today");
            return Ok(JobOutcome::AlreadySent { date: today });
        }

        if state.target_chat_id.is_empty() {
            tracing::warn!("No target chat configured; use /setchat");
            return Ok(JobOutcome::NoTarget);
        }

        let snapshot = self.cache.refresh_at(false, now).await?;
        let report = todays_birthdays(&snapshot.items, now, self.timezone);
        let text = report.message();

        let delivered = self.channel.send(&state.target_chat_id, &text).await?;

        if let Err(e) = self.state.mark_sent(&today).await {
            tracing::warn!(error = %e, date = %today, "Failed to record sent date");
        }

        let outcome = if !report.any_birth_date {
            JobOutcome::FieldMissing { date: today }
        } else if report.celebrants.is_empty() {
            JobOutcome::NobodyToday { date: today }
        } else {
            JobOutcome::Greeted {
                date: today,
                celebrants: report.celebrants.len(),
                listed: report.celebrants.len().min(MAX_GREETINGS),
            }
        };

        tracing::info!(
            outcome = %outcome,
            delivered = %delivered,
            channel = self.channel.name(),
            "Birthday job finished"
        );
        Ok(outcome)
    }
}
