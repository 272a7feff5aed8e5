use anyhow::{Context, Result};

use hodimbot::app::App;
use hodimbot::bot::replies;
use hodimbot::config::Config;

/// Print one page of a per-type listing
pub async fn list(config: Config, kind: String, page: Option<String>) -> Result<()> {
    let app = App::new(config)?;
    let text = app
        .directory
        .list(&kind, page.as_deref())
        .await
        .context("Failed to list employees")?;

    println!("{text}");
    Ok(())
}

/// Print search results
pub async fn search(config: Config, query: Vec<String>) -> Result<()> {
    let app = App::new(config)?;
    let text = app
        .directory
        .search(&query.join(" "))
        .await
        .context("Search failed")?;

    println!("{text}");
    Ok(())
}

/// Print configured types against cached and upstream counts
pub async fn types(config: Config) -> Result<()> {
    let app = App::new(config)?;
    let snapshot = app
        .cache
        .refresh(false)
        .await
        .context("Failed to load employee cache")?;

    println!("{}", replies::types(&snapshot, app.directory.kinds()));
    Ok(())
}

/// Print cache and notification status without contacting HEMIS
pub async fn status(config: Config) -> Result<()> {
    let app = App::new(config)?;
    let snapshot = app.cache.load().await;
    let state = app.state.load().await;

    println!(
        "{}",
        replies::status(
            &snapshot,
            &state,
            app.directory.kinds(),
            app.timezone,
            &app.schedule.to_string(),
        )
    );
    Ok(())
}
