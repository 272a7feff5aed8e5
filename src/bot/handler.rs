//! Command execution

use chrono_tz::Tz;
use std::sync::Arc;

use super::{replies, AdminList, BotCommand, CommandContext};
use crate::directory::Directory;
use crate::i18n::t;
use crate::notifications::{BirthdayJob, Channel};
use crate::scheduler::DailySchedule;
use crate::storage::StateStore;

/// Executes chat commands and delivers their replies
///
/// Replies go out through the channel as soon as they are produced, so a
/// "⏳" notice arrives before a slow `/sync` finishes.
pub struct CommandHandler {
    directory: Arc<Directory>,
    state: Arc<StateStore>,
    job: Arc<BirthdayJob>,
    channel: Arc<dyn Channel>,
    admins: AdminList,
    timezone: Tz,
    schedule: DailySchedule,
}

impl CommandHandler {
    pub fn new(
        directory: Arc<Directory>,
        state: Arc<StateStore>,
        job: Arc<BirthdayJob>,
        channel: Arc<dyn Channel>,
        admins: AdminList,
        timezone: Tz,
        schedule: DailySchedule,
    ) -> Self {
        Self {
            directory,
            state,
            job,
            channel,
            admins,
            timezone,
            schedule,
        }
    }

    /// Handle one incoming message; returns the replies that were produced
    pub async fn handle(&self, ctx: &CommandContext) -> Vec<String> {
        let Some(command) = BotCommand::parse(&ctx.text) else {
            return Vec::new();
        };

        tracing::debug!(
            command = command.name(),
            chat_id = %ctx.chat_id,
            user_id = ?ctx.user_id,
            "Handling command"
        );

        let mut replies = Vec::new();
        if command.requires_admin() && !self.admins.allows(ctx.user_id.as_deref()) {
            tracing::info!(command = command.name(), user_id = ?ctx.user_id, "Admin command denied");
            self.reply(ctx, &mut replies, t!("bot.not_admin").to_string()).await;
            return replies;
        }

        self.execute(command, ctx, &mut replies).await;
        replies
    }

    async fn reply(&self, ctx: &CommandContext, sent: &mut Vec<String>, text: String) {
        if let Err(e) = self.channel.send(&ctx.chat_id, &text).await {
            tracing::warn!(chat_id = %ctx.chat_id, error = %e, "Failed to send reply");
        }
        sent.push(text);
    }

    async fn execute(&self, command: BotCommand, ctx: &CommandContext, sent: &mut Vec<String>) {
        let name = command.name();
        let text = match command {
            BotCommand::Start => t!("bot.help").to_string(),
            BotCommand::Employees => self
                .directory
                .sample()
                .await
                .unwrap_or_else(|e| failure(name, "bot.errors.generic", &e)),
            BotCommand::List { kind, page } => self
                .directory
                .list(kind.as_deref().unwrap_or(""), page.as_deref())
                .await
                .unwrap_or_else(|e| failure(name, "bot.errors.list", &e)),
            BotCommand::Teachers { page } => self
                .directory
                .list("teacher", page.as_deref())
                .await
                .unwrap_or_else(|e| failure(name, "bot.errors.teachers", &e)),
            BotCommand::Staffs { page } => self
                .directory
                .list("staff", page.as_deref())
                .await
                .unwrap_or_else(|e| failure(name, "bot.errors.staffs", &e)),
            BotCommand::EmployeesAll { page } => self
                .directory
                .list("employee", page.as_deref())
                .await
                .unwrap_or_else(|e| failure(name, "bot.errors.employees_all", &e)),
            BotCommand::Search { query } => self
                .directory
                .search(&query)
                .await
                .unwrap_or_else(|e| failure(name, "bot.errors.search", &e)),
            BotCommand::Sync => {
                self.reply(ctx, sent, t!("bot.sync.started").to_string()).await;
                match self.directory.cache().refresh(true).await {
                    Ok(snapshot) => replies::sync_done(&snapshot),
                    Err(e) => failure(name, "bot.errors.sync", &e),
                }
            }
            BotCommand::Types => match self.directory.cache().refresh(false).await {
                Ok(snapshot) => replies::types(&snapshot, self.directory.kinds()),
                Err(e) => failure(name, "bot.errors.types", &e),
            },
            BotCommand::SetChat => match self.state.set_target_chat(&ctx.chat_id).await {
                Ok(state) => {
                    tracing::info!(chat_id = %state.target_chat_id, "Notification target updated");
                    t!("bot.setchat", chat_id = state.target_chat_id).to_string()
                }
                Err(e) => failure(name, "bot.errors.generic", &e),
            },
            BotCommand::Status => {
                let snapshot = self.directory.cache().load().await;
                let state = self.state.load().await;
                replies::status(
                    &snapshot,
                    &state,
                    self.directory.kinds(),
                    self.timezone,
                    &self.schedule.to_string(),
                )
            }
            BotCommand::Run => {
                self.reply(ctx, sent, t!("bot.run.started").to_string()).await;
                match self.job.run().await {
                    Ok(outcome) => {
                        tracing::info!(%outcome, "Manual birthday run finished");
                        t!("bot.run.done").to_string()
                    }
                    Err(e) => failure(name, "bot.errors.generic", &e),
                }
            }
        };

        self.reply(ctx, sent, text).await;
    }
}

/// Log the cause and produce the command's error reply
fn failure(command: &str, key: &str, error: &dyn std::fmt::Display) -> String {
    tracing::error!(command, error = %error, "Command failed");
    t!(key).to_string()
}
