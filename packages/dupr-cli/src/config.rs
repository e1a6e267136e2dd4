use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dupr_client::config::{
    DEFAULT_BASE_URL, DEFAULT_CLUB_MEMBERS_CAP, DEFAULT_MATCH_HISTORY_CAP, DEFAULT_SESSION_FILE,
};
use dupr_client::{ClientConfig, Credentials, PaginationLimits};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line flags. Every flag falls back to an environment variable,
/// which may come from a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "dupr")]
#[command(about = "Export DUPR club members and match history")]
pub struct Cli {
    /// User name to log into DUPR
    #[arg(long, env = "DUPR_USERNAME")]
    pub username: Option<String>,

    /// Password to log into DUPR
    #[arg(long, env = "DUPR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Export players belonging to this DUPR club id
    #[arg(long, alias = "club_id", env = "DUPR_CLUB_ID")]
    pub club_id: Option<String>,

    #[arg(long, env = "DUPR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Where the login response is cached between runs
    #[arg(long, env = "DUPR_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    pub session_file: PathBuf,

    /// Debug mode, log request and response bodies
    #[arg(long, env = "DUPR_DEBUG")]
    pub debug: bool,

    #[arg(long, env = "DUPR_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Stop a club-members walk at this many records
    #[arg(long, env = "DUPR_MEMBER_CAP", default_value_t = DEFAULT_CLUB_MEMBERS_CAP)]
    pub member_cap: u64,

    /// Stop a match-history walk at this many records
    #[arg(long, env = "DUPR_HISTORY_CAP", default_value_t = DEFAULT_MATCH_HISTORY_CAP)]
    pub history_cap: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Export club members with their doubles rating (default)
    Members {
        #[arg(long, default_value = "players.csv")]
        output: PathBuf,
    },

    /// Export a member's recent matches
    History {
        #[arg(long)]
        member_id: String,
        #[arg(long, default_value = "matches.csv")]
        output: PathBuf,
    },

    /// Print a single player profile as JSON
    Player {
        #[arg(long)]
        id: String,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Members {
            output: PathBuf::from("players.csv"),
        }
    }
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(&self.base_url)
            .with_session_path(&self.session_file)
            .with_debug(self.debug)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn limits(&self) -> Result<PaginationLimits> {
        let limits = PaginationLimits {
            club_members_cap: self.member_cap,
            match_history_cap: self.history_cap,
        };
        limits.validate().context("Invalid pagination caps")?;
        Ok(limits)
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let username = required(&self.username, "username")?;
        let password = required(&self.password, "password")?;
        Ok(Credentials::new(username, password))
    }

    pub fn club_id(&self) -> Result<&str> {
        required(&self.club_id, "club_id")
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .with_context(|| format!("{} is required", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["dupr"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_build_client_config() {
        let cli = parse(&[
            "--username", "me@example.com",
            "--password", "pw",
            "--club_id", "42",
            "--base-url", "http://localhost:9000",
            "--session-file", "/tmp/s.json",
            "--debug",
        ]);

        let config = cli.client_config();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.session_path, PathBuf::from("/tmp/s.json"));
        assert!(config.debug);
        assert_eq!(cli.club_id().unwrap(), "42");
        assert_eq!(cli.credentials().unwrap().email, "me@example.com");
    }

    #[test]
    fn test_subcommand_defaults_to_members() {
        let cli = parse(&["--username", "u", "--password", "p"]);
        let command = cli.command.clone().unwrap_or_default();
        assert!(matches!(command, Commands::Members { ref output } if output == &PathBuf::from("players.csv")));
    }

    #[test]
    fn test_history_subcommand() {
        let cli = parse(&["--history-cap", "50", "history", "--member-id", "7"]);
        assert!(matches!(cli.command, Some(Commands::History { ref member_id, .. }) if member_id == "7"));
        assert_eq!(cli.limits().unwrap().match_history_cap, 50);
    }

    #[test]
    fn test_missing_values_are_reported() {
        let cli = Cli {
            username: Some(String::new()),
            password: None,
            club_id: None,
            base_url: DEFAULT_BASE_URL.into(),
            session_file: DEFAULT_SESSION_FILE.into(),
            debug: false,
            timeout_secs: 30,
            member_cap: 0,
            history_cap: 20,
            command: None,
        };

        let err = cli.credentials().unwrap_err();
        assert_eq!(err.to_string(), "username is required");
        assert_eq!(cli.club_id().unwrap_err().to_string(), "club_id is required");
        assert!(cli.limits().is_err());
    }
}
