//! Daily birthday trigger
//!
//! Fires the birthday job once a day at a cron-like `"M H * * *"` time in
//! the configured time zone.

use chrono::{DateTime, Days, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

use super::error::{SchedulerError, SchedulerResult};
use crate::notifications::BirthdayJob;

// ============================================================================
// Daily Schedule
// ============================================================================

/// A once-a-day firing time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    minute: u32,
    hour: u32,
}

impl DailySchedule {
    /// Build from an hour and minute
    pub fn new(hour: u32, minute: u32) -> SchedulerResult<Self> {
        if hour > 23 {
            return Err(SchedulerError::invalid_hour(hour));
        }
        if minute > 59 {
            return Err(SchedulerError::InvalidMinute { minute });
        }
        Ok(Self { minute, hour })
    }

    /// Parse `"M H * * *"`
    ///
    /// Minute and hour must be plain numbers; the remaining three fields
    /// must be `*`.
    pub fn parse(expr: &str) -> SchedulerResult<Self> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(SchedulerError::invalid_cron(
                expr,
                format!("expected 5 fields, got {}", fields.len()),
            ));
        }

        for (name, field) in ["day-of-month", "month", "day-of-week"]
            .iter()
            .zip(&fields[2..])
        {
            if *field != "*" {
                return Err(SchedulerError::invalid_cron(expr, format!("{name} must be '*'")));
            }
        }

        let minute = fields[0]
            .parse::<u32>()
            .map_err(|_| SchedulerError::invalid_cron(expr, "minute must be a number"))?;
        let hour = fields[1]
            .parse::<u32>()
            .map_err(|_| SchedulerError::invalid_cron(expr, "hour must be a number"))?;

        Self::new(hour, minute)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Next firing strictly after `now`, as observed in `tz`
    pub fn next_after(&self, now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default();
        let today = now.with_timezone(&tz).date_naive();

        // A DST gap can swallow the local time on one day; look a few days ahead.
        for offset in 0..4 {
            let Some(date) = today.checked_add_days(Days::new(offset)) else {
                break;
            };
            if let Some(candidate) = tz.from_local_datetime(&date.and_time(time)).earliest() {
                let candidate = candidate.with_timezone(&Utc);
                if candidate > now {
                    return candidate;
                }
            }
        }

        now + chrono::Duration::days(1)
    }
}

impl FromStr for DailySchedule {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DailySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} * * *", self.minute, self.hour)
    }
}

// ============================================================================
// Birthday Trigger
// ============================================================================

/// Runs [`BirthdayJob`] at every firing of a [`DailySchedule`]
pub struct BirthdayTrigger {
    job: Arc<BirthdayJob>,
    schedule: DailySchedule,
    timezone: Tz,
}

impl BirthdayTrigger {
    pub fn new(job: Arc<BirthdayJob>, schedule: DailySchedule, timezone: Tz) -> Self {
        Self {
            job,
            schedule,
            timezone,
        }
    }

    /// Next firing after the current instant
    pub fn next_run(&self) -> DateTime<Utc> {
        self.schedule.next_after(Utc::now(), self.timezone)
    }

    /// Loop until `shutdown` flips to `true` or its sender is dropped
    ///
    /// Job failures are logged; the loop keeps going and tries again at the
    /// next firing.
    pub async fn start(&self, mut shutdown: watch::Receiver<bool>) -> SchedulerResult<()> {
        tracing::info!(
            schedule = %self.schedule,
            timezone = %self.timezone,
            "Birthday trigger started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let now = Utc::now();
            let next = self.schedule.next_after(now, self.timezone);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::debug!(next = %next, wait_secs = wait.as_secs(), "Sleeping until next firing");

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    match self.job.run().await {
                        Ok(outcome) => tracing::info!(%outcome, "Scheduled birthday run finished"),
                        Err(e) => {
                            let err = SchedulerError::execution_failed(e.to_string());
                            tracing::error!(error = %err, "Scheduled birthday run failed");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Birthday trigger stopped");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
