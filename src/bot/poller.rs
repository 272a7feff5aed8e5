//! `getUpdates` long-polling loop

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;

use super::{CommandContext, CommandHandler};
use crate::notifications::channels::telegram::Update;
use crate::notifications::TelegramChannel;

/// Pause after a failed poll
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Longest wait for in-flight commands at shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

/// Offset to acknowledge after a batch of updates
pub fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .max(current)
}

/// Poll for messages until `shutdown` flips to `true`
///
/// Each command is handled on its own task, so a slow `/sync` does not
/// hold up other chats. Tasks still running at shutdown are awaited before
/// this returns.
pub async fn run_polling(
    channel: Arc<TelegramChannel>,
    handler: Arc<CommandHandler>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut offset: Option<i64> = None;
    let mut in_flight = JoinSet::new();
    tracing::info!("Telegram polling started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let updates = tokio::select! {
            result = channel.get_updates(offset) => result,
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed; retrying");
                tokio::select! {
                    _ = tokio::time::sleep(ERROR_BACKOFF) => {}
                    _ = shutdown.changed() => {}
                }
                continue;
            }
        };

        offset = next_offset(offset, &updates);
        while in_flight.try_join_next().is_some() {}

        for update in updates {
            let Some(ctx) = update.message.as_ref().and_then(CommandContext::from_message) else {
                continue;
            };
            let handler = Arc::clone(&handler);
            in_flight.spawn(async move {
                handler.handle(&ctx).await;
            });
        }
    }

    drain(in_flight, DRAIN_TIMEOUT).await;
    tracing::info!("Telegram polling stopped");
}

/// Wait up to `limit` for in-flight command tasks
///
/// Returns how many finished. Tasks still running after `limit` are aborted
/// when the set is dropped.
pub async fn drain(mut in_flight: JoinSet<()>, limit: Duration) -> usize {
    let pending = in_flight.len();
    if pending > 0 {
        tracing::info!(pending, "Waiting for in-flight commands");
    }

    let mut finished = 0;
    let waited = tokio::time::timeout(limit, async {
        while let Some(result) = in_flight.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Command task failed");
            }
            finished += 1;
        }
    })
    .await;

    if waited.is_err() {
        tracing::warn!(abandoned = in_flight.len(), "In-flight commands did not finish in time");
    }
    finished
}
