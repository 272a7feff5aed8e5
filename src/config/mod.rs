//! Configuration management for hodimbot
//!
//! Configuration comes from environment variables (optionally seeded from a
//! `.env` file) or from a TOML file. Every field has a default except the
//! two tokens.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::directory::listing::{clamp_page_size, DEFAULT_PAGE_SIZE};
use crate::models::EmployeeKinds;
use crate::notifications::channels::telegram::DEFAULT_API_BASE;
use crate::scheduler::error::{SchedulerError, SchedulerResult};
use crate::scheduler::trigger::DailySchedule;
use crate::storage::{CACHE_FILE_NAME, STATE_FILE_NAME};
use crate::upstream::aggregate::DEFAULT_PAGE_LIMIT;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Telegram bot configuration
    pub telegram: TelegramConfig,

    /// HEMIS upstream configuration
    pub hemis: HemisConfig,

    /// Local cache configuration
    pub cache: CacheConfig,

    /// Birthday schedule configuration
    pub schedule: ScheduleConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,

    /// User ids allowed to run admin commands; empty allows everyone
    pub admin_ids: Vec<String>,

    /// Chat receiving birthday greetings until `/setchat` overrides it
    pub target_chat_id: String,

    /// Bot API base URL
    pub api_base: String,

    /// Long-poll timeout in seconds
    pub poll_timeout_secs: u64,
}

/// HEMIS upstream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HemisConfig {
    /// REST base URL
    pub base_url: String,

    /// Bearer token
    pub token: String,

    /// Employee types to mirror
    pub employee_types: Vec<String>,

    /// Rows per upstream page
    pub page_limit: u32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// `l=` language parameter
    pub language: String,
}

/// Local cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding the cache and state files
    pub data_dir: PathBuf,

    /// Hours a snapshot is served without refreshing
    pub freshness_hours: u64,

    /// Records per `/list` page (clamped to 5..=25)
    pub list_page_size: usize,
}

/// Birthday schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Daily firing time as `"M H * * *"` (`CRON_TIME`)
    ///
    /// Only a numeric minute and hour are accepted. Day-of-month, month and
    /// day-of-week must be `*`, so expressions such as `0 9 * * 1-5` or
    /// `*/30 * * * *` fail validation.
    pub cron_time: String,

    /// IANA time zone for the schedule and date matching
    pub timezone: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            admin_ids: Vec::new(),
            target_chat_id: String::new(),
            api_base: String::from(DEFAULT_API_BASE),
            poll_timeout_secs: 30,
        }
    }
}

impl Default for HemisConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://student.sies.uz/rest"),
            token: String::new(),
            employee_types: vec![String::from("staff")],
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout_secs: 25,
            language: String::from("uz-UZ"),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            freshness_hours: 6,
            list_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron_time: String::from("0 9 * * *"),
            timezone: String::from("Asia/Tashkent"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Split a comma-separated list, dropping blanks
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let employee_types = std::env::var("EMPLOYEE_TYPES")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| defaults.hemis.employee_types.clone());

        let admin_ids = std::env::var("ADMIN_IDS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Ok(Self {
            telegram: TelegramConfig {
                bot_token: env_or("BOT_TOKEN", ""),
                admin_ids,
                target_chat_id: env_or("TARGET_CHAT_ID", ""),
                api_base: env_or("TELEGRAM_API_BASE", &defaults.telegram.api_base),
                poll_timeout_secs: env_parse("TELEGRAM_POLL_TIMEOUT", defaults.telegram.poll_timeout_secs),
            },
            hemis: HemisConfig {
                base_url: env_or("HEMIS_BASE", &defaults.hemis.base_url),
                token: env_or("HEMIS_TOKEN", ""),
                employee_types,
                page_limit: env_parse("HEMIS_PAGE_LIMIT", defaults.hemis.page_limit),
                request_timeout_secs: env_parse("HEMIS_TIMEOUT", defaults.hemis.request_timeout_secs),
                language: env_or("HEMIS_LANG", &defaults.hemis.language),
            },
            cache: CacheConfig {
                data_dir: PathBuf::from(env_or("DATA_DIR", "data")),
                freshness_hours: env_parse("CACHE_FRESHNESS_HOURS", defaults.cache.freshness_hours),
                list_page_size: env_parse("TYPE_LIST_PAGE_SIZE", defaults.cache.list_page_size),
            },
            schedule: ScheduleConfig {
                cron_time: env_or("CRON_TIME", &defaults.schedule.cron_time),
                timezone: env_or("TZ", &defaults.schedule.timezone),
            },
            logging: LoggingConfig {
                level: env_or("HODIMBOT_LOG_LEVEL", &defaults.logging.level),
                format: env_or("HODIMBOT_LOG_FORMAT", &defaults.logging.format),
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate everything the directory and scheduler need
    pub fn validate(&self) -> Result<()> {
        if self.hemis.token.trim().is_empty() {
            anyhow::bail!("HEMIS_TOKEN is required");
        }

        if self.hemis.employee_types.is_empty() {
            anyhow::bail!("employee_types must list at least one type");
        }

        if self.hemis.page_limit == 0 {
            anyhow::bail!("page_limit must be greater than 0");
        }

        if self.hemis.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        self.timezone()?;
        self.daily_schedule()?;

        Ok(())
    }

    /// Additionally require the bot token, for commands that talk to Telegram
    pub fn validate_bot(&self) -> Result<()> {
        self.validate()?;
        if self.telegram.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is required");
        }
        Ok(())
    }

    /// Parsed schedule time zone
    pub fn timezone(&self) -> SchedulerResult<Tz> {
        self.schedule
            .timezone
            .parse::<Tz>()
            .map_err(|_| SchedulerError::InvalidTimezone {
                tz: self.schedule.timezone.clone(),
            })
    }

    /// Parsed cron expression
    pub fn daily_schedule(&self) -> SchedulerResult<DailySchedule> {
        DailySchedule::parse(&self.schedule.cron_time)
    }

    /// Configured employee types
    pub fn employee_kinds(&self) -> EmployeeKinds {
        EmployeeKinds::new(&self.hemis.employee_types)
    }

    /// `/list` page size after clamping
    #[must_use]
    pub fn list_page_size(&self) -> usize {
        clamp_page_size(self.cache.list_page_size)
    }

    /// Snapshot freshness window
    #[must_use]
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.cache.freshness_hours * 60 * 60)
    }

    /// Path of `employees_cache.json`
    pub fn cache_path(&self) -> PathBuf {
        self.cache.data_dir.join(CACHE_FILE_NAME)
    }

    /// Path of `state.json`
    pub fn state_path(&self) -> PathBuf {
        self.cache.data_dir.join(STATE_FILE_NAME)
    }
}
