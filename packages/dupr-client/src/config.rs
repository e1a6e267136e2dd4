//! Client and pagination settings.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{DuprError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.dupr.gg";
pub const DEFAULT_SESSION_FILE: &str = "dupr.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Stop a club-members walk once the next offset reaches this many records.
pub const DEFAULT_CLUB_MEMBERS_CAP: u64 = 1000;
/// Stop a match-history walk once the next offset reaches this many records.
pub const DEFAULT_MATCH_HISTORY_CAP: u64 = 20;

/// Connection settings for [`crate::DuprClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base endpoint; relative paths are appended after a `/`.
    pub base_url: String,
    /// Where the raw login response is persisted.
    pub session_path: PathBuf,
    /// Log every request and response body at debug level.
    pub debug: bool,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_path: PathBuf::from(DEFAULT_SESSION_FILE),
            debug: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = path.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Safety caps for each fetch operation.
///
/// The caps bound how far a walk may advance even when the server keeps
/// reporting a larger `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationLimits {
    pub club_members_cap: u64,
    pub match_history_cap: u64,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            club_members_cap: DEFAULT_CLUB_MEMBERS_CAP,
            match_history_cap: DEFAULT_MATCH_HISTORY_CAP,
        }
    }
}

impl PaginationLimits {
    pub fn validate(&self) -> Result<()> {
        if self.club_members_cap == 0 || self.match_history_cap == 0 {
            return Err(DuprError::Config(
                "pagination caps must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
