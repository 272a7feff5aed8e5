use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;

use hodimbot::app::App;
use hodimbot::bot::poller::run_polling;
use hodimbot::config::Config;
use hodimbot::notifications::Channel;

// ============================================================================
// Bot Server
// ============================================================================

/// Run the bot: command polling plus the daily birthday trigger
pub async fn serve(config: Config) -> Result<()> {
    config.validate_bot()?;
    let app = App::new(config)?;

    let telegram = app.telegram_channel()?;
    if !telegram.health_check().await? {
        tracing::warn!("Telegram getMe failed; polling anyway");
    }

    let channel: Arc<dyn Channel> = telegram.clone();
    let job = app.birthday_job(Arc::clone(&channel));
    let handler = Arc::new(app.command_handler(channel, Arc::clone(&job)));
    let trigger = app.birthday_trigger(job);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let polling = tokio::spawn(run_polling(telegram, handler, shutdown_rx.clone()));
    let scheduling = tokio::spawn(async move { trigger.start(shutdown_rx).await });

    println!("hodimbot running. Press Ctrl+C to stop.");

    // Wait for shutdown signal
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Shutdown signal received");
        }
        Err(e) => {
            tracing::error!("Failed to wait for Ctrl+C: {}", e);
        }
    }

    let _ = shutdown_tx.send(true);
    polling.await.context("Polling task panicked")?;
    scheduling
        .await
        .context("Scheduler task panicked")?
        .context("Scheduler stopped with an error")?;

    println!("hodimbot stopped.");
    Ok(())
}

// ============================================================================
// One-off Birthday Run
// ============================================================================

/// Run the birthday job once, as `/run` does
pub async fn run(config: Config) -> Result<()> {
    config.validate_bot()?;
    let app = App::new(config)?;

    let channel: Arc<dyn Channel> = app.telegram_channel()?;
    let job = app.birthday_job(channel);
    let outcome = job.run().await.context("Birthday job failed")?;

    println!("{outcome}");
    Ok(())
}
