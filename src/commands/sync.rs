use anyhow::{Context, Result};

use hodimbot::app::App;
use hodimbot::bot::replies;
use hodimbot::config::Config;

/// Refresh the employee cache from HEMIS
pub async fn sync(config: Config, force: bool) -> Result<()> {
    let app = App::new(config)?;

    let snapshot = app
        .cache
        .refresh(force)
        .await
        .context("Failed to refresh employee cache")?;

    println!("{}", replies::sync_done(&snapshot));
    Ok(())
}
