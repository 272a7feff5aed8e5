//! Error types for the scheduler module

use std::fmt;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-specific errors
#[derive(Debug)]
pub enum SchedulerError {
    /// Cron expression outside the supported `"M H * * *"` form
    InvalidCron { expr: String, reason: String },

    /// Invalid minute value (must be 0-59)
    InvalidMinute { minute: u32 },

    /// Invalid hour value (must be 0-23)
    InvalidHour { hour: u32 },

    /// Unknown IANA time zone
    InvalidTimezone { tz: String },

    /// Trigger execution error
    TriggerExecutionFailed { reason: String },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCron { expr, reason } => {
                write!(f, "Invalid cron expression '{}': {}", expr, reason)
            }
            Self::InvalidMinute { minute } => {
                write!(f, "Invalid minute '{}'. Must be 0-59", minute)
            }
            Self::InvalidHour { hour } => {
                write!(f, "Invalid hour '{}'. Must be 0-23", hour)
            }
            Self::InvalidTimezone { tz } => {
                write!(f, "Invalid timezone: {}", tz)
            }
            Self::TriggerExecutionFailed { reason } => {
                write!(f, "Trigger execution failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for SchedulerError {}

impl SchedulerError {
    /// Create an invalid cron error
    pub fn invalid_cron(expr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCron {
            expr: expr.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid hour error
    pub fn invalid_hour(hour: u32) -> Self {
        Self::InvalidHour { hour }
    }

    /// Create a trigger execution error
    pub fn execution_failed(reason: impl Into<String>) -> Self {
        Self::TriggerExecutionFailed {
            reason: reason.into(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::TriggerExecutionFailed { .. })
    }
}
