//! adsync - advert campaign sync tool

use adsync_common::logging::{init_logging, LogConfig, LogLevel};
use adsync_ingest::{config::SyncConfig, pipeline, RunOutcome};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "adsync")]
#[command(author, version, about = "Sync advertising campaign metadata into SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch campaigns once and append them to the database (default)
    Sync {
        /// Create the adverts table first if it is missing
        #[arg(long)]
        create_tables: bool,
    },

    /// Create the adverts table if it is missing, then exit
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Loads .env first so LOG_* variables from it apply below
    let mut config = SyncConfig::load()?;

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    let log_config = LogConfig::default()
        .with_level(log_level)
        .with_log_file_prefix("adsync")
        .with_filter_directives("sqlx=warn,hyper=info,reqwest=info");
    // Environment variables take precedence
    let _log_guard = init_logging(&LogConfig::from_env_or(log_config)?)?;

    match cli.command.unwrap_or(Command::Sync {
        create_tables: false,
    }) {
        Command::Sync { create_tables } => {
            config.database.auto_create_tables |= create_tables;
            report(pipeline::run(&config).await?);
        },
        Command::InitDb => {
            pipeline::provision(&config).await?;
            info!(database = %config.database.url, "Database initialized");
        },
    }

    Ok(())
}

fn report(outcome: RunOutcome) {
    match outcome {
        RunOutcome::MissingToken => {
            warn!("No API token found in the environment (TOKEN); nothing to do");
        },
        RunOutcome::FetchFailed(e) => {
            error!(error = %e, kind = ?e.kind(), "Advert API request failed");
        },
        RunOutcome::PersistFailed(e) => {
            error!(error = %e, kind = ?e.kind(), "Failed to insert advert data; batch rolled back");
        },
        RunOutcome::Completed(summary) => {
            info!(inserted = summary.inserted, "Advert data saved to the database");
        },
    }
}
