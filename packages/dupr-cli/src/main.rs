//! `dupr` - export DUPR club members and match history.
//!
//! Logs in (reusing the cached session when it carries a token), walks the
//! requested endpoint and writes one CSV row per record.

mod config;
mod csv;
mod export;

use anyhow::{Context, Result};
use clap::Parser;
use dupr_client::{Completion, DuprClient, Paged};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv()?;
    let cli = Cli::parse();
    init_logging(cli.debug);

    tracing::info!(
        username = cli.username.as_deref().unwrap_or_default(),
        password = "******",
        club_id = cli.club_id.as_deref().unwrap_or_default(),
        "Starting"
    );

    let mut client = DuprClient::new(cli.client_config()).context("Failed to create HTTP client")?;

    match cli.command.clone().unwrap_or_default() {
        Commands::Members { output } => {
            let club_id = cli.club_id()?;
            let limits = cli.limits()?;
            client
                .login(&cli.credentials()?)
                .await
                .context("Login failed")?;

            let members = client
                .club_members(club_id, &limits)
                .await
                .context("Failed to fetch club members")?;
            tracing::info!("{} members found.", members.len());

            let rows = export::member_rows(&members.items);
            write_and_check(&output, &rows, members)?;
        }

        Commands::History { member_id, output } => {
            let limits = cli.limits()?;
            client
                .login(&cli.credentials()?)
                .await
                .context("Login failed")?;

            let matches = client
                .match_history(&member_id, &limits)
                .await
                .context("Failed to fetch match history")?;
            tracing::info!("{} matches found.", matches.len());

            let rows = export::match_rows(&matches.items);
            write_and_check(&output, &rows, matches)?;
        }

        Commands::Player { id } => {
            let player = client
                .get_player(&id)
                .await
                .with_context(|| format!("Failed to fetch player {}", id))?;
            println!("{}", serde_json::to_string_pretty(&player)?);
        }
    }

    Ok(())
}

/// Write whatever was fetched, then fail the run if the walk stopped on an
/// error.
fn write_and_check<T>(output: &Path, rows: &[Vec<String>], paged: Paged<T>) -> Result<()> {
    csv::write_file(output, rows)
        .with_context(|| format!("Error writing to CSV file {}", output.display()))?;
    tracing::info!(path = %output.display(), rows = rows.len(), "CSV written");

    match paged.completion {
        Completion::Exhausted => Ok(()),
        Completion::Capped { next_offset } => {
            tracing::warn!(next_offset, "Stopped at safety cap, output may be incomplete");
            Ok(())
        }
        Completion::Partial(e) => {
            Err(e).context("Fetch stopped early; the CSV holds only the pages fetched before the error")
        }
    }
}

/// A missing `.env` is fine, an unreadable one is not.
fn load_dotenv() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Error loading .env file"),
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug {
        "debug,hyper=info,reqwest=info"
    } else {
        "info,dupr_client=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
