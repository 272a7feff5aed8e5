//! Component wiring
//!
//! [`App`] builds the shared stores once from a [`Config`]; the CLI and the
//! bot borrow handles from it.

use chrono_tz::Tz;
use std::sync::Arc;

use crate::bot::{AdminList, CommandHandler};
use crate::config::Config;
use crate::directory::Directory;
use crate::error::{Error, Result};
use crate::notifications::{BirthdayJob, Channel, TelegramChannel};
use crate::scheduler::{BirthdayTrigger, DailySchedule};
use crate::storage::{CacheStore, StateStore};
use crate::upstream::{EmployeeSource, HemisClient};

/// Shared application state
pub struct App {
    pub config: Config,
    pub cache: Arc<CacheStore>,
    pub state: Arc<StateStore>,
    pub directory: Arc<Directory>,
    pub timezone: Tz,
    pub schedule: DailySchedule,
}

impl App {
    /// Validate `config` and build the stores against HEMIS
    pub fn new(config: Config) -> Result<Self> {
        let source: Arc<dyn EmployeeSource> = Arc::new(HemisClient::new(&config.hemis)?);
        Self::with_source(config, source)
    }

    /// Build against any employee source
    pub fn with_source(config: Config, source: Arc<dyn EmployeeSource>) -> Result<Self> {
        let timezone = config.timezone()?;
        let schedule = config.daily_schedule()?;
        config.validate().map_err(|e| Error::config(e.to_string()))?;

        let kinds = config.employee_kinds();
        let cache = Arc::new(CacheStore::new(
            config.cache_path(),
            source,
            &kinds,
            config.hemis.page_limit,
            config.freshness(),
        ));
        let state = Arc::new(StateStore::new(
            config.state_path(),
            config.telegram.target_chat_id.clone(),
        ));
        let directory = Arc::new(Directory::new(
            Arc::clone(&cache),
            kinds,
            config.list_page_size(),
        ));

        tracing::debug!(
            data_dir = %config.cache.data_dir.display(),
            timezone = %timezone,
            schedule = %schedule,
            "Application initialized"
        );

        Ok(Self {
            config,
            cache,
            state,
            directory,
            timezone,
            schedule,
        })
    }

    /// Telegram channel for the configured bot
    pub fn telegram_channel(&self) -> Result<Arc<TelegramChannel>> {
        Ok(Arc::new(TelegramChannel::new(&self.config.telegram)?))
    }

    /// Birthday job delivering through `channel`
    pub fn birthday_job(&self, channel: Arc<dyn Channel>) -> Arc<BirthdayJob> {
        Arc::new(BirthdayJob::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.state),
            channel,
            self.timezone,
        ))
    }

    /// Daily trigger for `job`
    pub fn birthday_trigger(&self, job: Arc<BirthdayJob>) -> BirthdayTrigger {
        BirthdayTrigger::new(job, self.schedule, self.timezone)
    }

    /// Command handler replying through `channel`
    pub fn command_handler(&self, channel: Arc<dyn Channel>, job: Arc<BirthdayJob>) -> CommandHandler {
        CommandHandler::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.state),
            job,
            channel,
            AdminList::new(&self.config.telegram.admin_ids),
            self.timezone,
            self.schedule,
        )
    }
}
