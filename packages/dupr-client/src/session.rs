//! Session persistence.
//!
//! The raw login response is stored verbatim in a single JSON file. Loading
//! it back distinguishes a missing file (recoverable: log in again) from a
//! corrupt one (fatal for the run).

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{DuprError, Result};
use crate::mapper::lenient;
use crate::types::ApiResponse;

/// Bearer token pair returned by a successful login.
///
/// There is no expiry tracking; a stale token surfaces as server-side
/// authentication failures.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    #[serde(deserialize_with = "lenient")]
    pub access_token: String,
    #[serde(deserialize_with = "lenient")]
    pub refresh_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &if self.has_token() { "[REDACTED]" } else { "" })
            .field("refresh_token", &if self.refresh_token.is_empty() { "" } else { "[REDACTED]" })
            .finish()
    }
}

/// Body of the login endpoint, also the on-disk format.
pub type LoginResponse = ApiResponse<Session>;

/// File-backed store for the login response.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored session.
    ///
    /// An empty access token is returned as-is with a warning.
    pub async fn load(&self) -> Result<Session> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DuprError::SessionNotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let response: LoginResponse =
            serde_json::from_slice(&bytes).map_err(|source| DuprError::SessionParse {
                path: self.path.clone(),
                source,
            })?;

        if !response.result.has_token() {
            warn!(path = %self.path.display(), "Access token is empty");
        }
        debug!(path = %self.path.display(), "Session loaded");

        Ok(response.result)
    }

    /// Overwrite the stored session with a raw login response body.
    pub async fn save_raw(&self, body: &[u8]) -> Result<()> {
        tokio::fs::write(&self.path, body).await?;
        debug!(path = %self.path.display(), bytes = body.len(), "Session written");
        Ok(())
    }

    /// Overwrite the stored session with a serialized login response.
    pub async fn save(&self, response: &LoginResponse) -> Result<()> {
        let body = serde_json::to_vec(response)?;
        self.save_raw(&body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STATUS_SUCCESS;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("dupr.json"))
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let response = LoginResponse {
            status: STATUS_SUCCESS.to_string(),
            message: String::new(),
            result: Session::new("access-abc", "refresh-xyz"),
        };
        store.save(&response).await.unwrap();

        let session = store.load().await.unwrap();
        assert_eq!(session.access_token, "access-abc");
        assert_eq!(session.refresh_token, "refresh-xyz");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = store_in(&dir).load().await.unwrap_err();
        assert!(err.is_session_missing());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save_raw(b"{not json").await.unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, DuprError::SessionParse { .. }));
    }

    #[tokio::test]
    async fn test_failed_login_body_loads_with_empty_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store
            .save_raw(br#"{"status":"FAILURE","message":"Invalid credentials"}"#)
            .await
            .unwrap();

        let session = store.load().await.unwrap();
        assert!(!session.has_token());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let debug = format!("{:?}", Session::new("secret-token", "secret-refresh"));
        assert!(!debug.contains("secret"));
    }
}
