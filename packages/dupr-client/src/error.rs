//! Typed errors for the DUPR client.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can branch
//! on the failure kind instead of matching on strings.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the rating service.
#[derive(Debug, Error)]
pub enum DuprError {
    /// Login did not produce a parseable response
    #[error("login failed: {0}")]
    Auth(String),

    /// Server answered the login call but rejected the credentials
    #[error("login rejected by server: {message}")]
    LoginRejected { message: String },

    /// No stored session at the given path
    #[error("no session file at {}", path.display())]
    SessionNotFound { path: PathBuf },

    /// Stored session exists but cannot be parsed
    #[error("session file {} is corrupt: {source}", path.display())]
    SessionParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// 2xx reply whose `status` header is not `SUCCESS`
    #[error("service reported {status}: {message}")]
    ServiceFailure { status: String, message: String },

    /// Response body is not the expected shape
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Filesystem failure while persisting the session
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client or pagination settings
    #[error("config error: {0}")]
    Config(String),
}

impl DuprError {
    /// True when the stored session is simply missing, which callers route
    /// into a fresh login rather than aborting.
    pub fn is_session_missing(&self) -> bool {
        matches!(self, DuprError::SessionNotFound { .. })
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, DuprError>;
