use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hodimbot::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "hodimbot",
    version,
    about = "HEMIS employee directory bot with listings, search and birthday greetings",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (environment variables are used otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides HODIMBOT_LOG_FORMAT
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot and the daily birthday trigger
    Serve,

    /// Refresh the employee cache from HEMIS
    Sync {
        /// Refresh even when the cache is still fresh
        #[arg(long, default_value = "false")]
        force: bool,
    },

    /// Show one page of employees of a type
    List {
        /// Employee type (e.g. teacher, staff)
        kind: String,

        /// Page number
        page: Option<String>,
    },

    /// Search employees by name, login or any other field
    Search {
        /// Search text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show configured types with upstream and cached counts
    Types,

    /// Show cache and notification status
    Status,

    /// Send today's birthday message now
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;
    hodimbot::i18n::init_from_env();

    tracing::info!("hodimbot starting");

    match cli.command {
        Commands::Serve => {
            tracing::info!(types = ?config.hemis.employee_types, "Starting serve command");
            commands::serve(config).await?;
        }

        Commands::Sync { force } => {
            tracing::info!(force = %force, "Starting sync command");
            commands::sync(config, force).await?;
        }

        Commands::List { kind, page } => {
            tracing::info!(kind = %kind, page = ?page, "Starting list command");
            commands::list(config, kind, page).await?;
        }

        Commands::Search { query } => {
            tracing::info!(query = ?query, "Starting search command");
            commands::search(config, query).await?;
        }

        Commands::Types => commands::types(config).await?,

        Commands::Status => commands::status(config).await?,

        Commands::Run => {
            tracing::info!("Starting run command");
            commands::run(config).await?;
        }
    }

    tracing::info!("hodimbot completed successfully");
    Ok(())
}

/// Read `.env`, then the TOML file if given, otherwise the environment
fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            anyhow::bail!("Failed to read .env file: {e}");
        }
    }

    match path {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("hodimbot=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("hodimbot={level},warn"))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hodimbot=info,warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
