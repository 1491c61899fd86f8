//! RosterLink command line front end
//!
//! Runs the cache-backed Toornament commands that need no chat platform.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rosterlink_api::{commands, init_tracing, AppContext};
use rosterlink_infra::config::load_settings_from_env;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "rosterlink", about = "Toornament roster tools", long_about = None)]
struct Cli {
    /// Credential file to use instead of the probed locations
    #[arg(long, value_name = "PATH", global = true)]
    auth: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every team of a tournament as JSON
    ListTeams {
        /// Toornament tournament id
        tournament: String,
    },
    /// Register a tournament and seed its default configuration
    Register {
        /// Toornament tournament id
        tournament: String,
        /// Discord guild hosting the tournament
        guild: u64,
        /// Display name
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => warn!(error = %e, "Could not load .env file"),
    }

    let cli = Cli::parse();

    let mut settings = load_settings_from_env().context("invalid settings")?;
    if cli.auth.is_some() {
        settings.auth_path = cli.auth;
    }

    let ctx = AppContext::new(settings, None).await.context("failed to initialize")?;

    let output = match cli.command {
        Command::ListTeams { tournament } => {
            let teams = commands::list_teams(&ctx, &tournament).await?;
            serde_json::to_string_pretty(&teams)?
        }
        Command::Register { tournament, guild, name } => {
            let info = commands::register_tournament(&ctx, &tournament, guild, name.as_deref())
                .await?;
            serde_json::to_string_pretty(&info)?
        }
    };
    println!("{output}");

    Ok(())
}
