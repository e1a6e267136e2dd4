//! HTTP client and session context.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::error::{DuprError, Result};
use crate::pagination::{PageEnvelope, PageRequest, PageSource};
use crate::session::{LoginResponse, Session, SessionStore};
use crate::types::{ApiResponse, PlayerProfile};

pub const LOGIN_PATH: &str = "auth/v1.0/login/";

pub fn player_path(player_id: &str) -> String {
    format!("player/v1.0/{}", player_id)
}

/// Rating-service client.
///
/// Constructed once per run and passed by reference to everything that talks
/// to the service. Holds the current [`Session`]; the bearer token is only
/// attached when it is non-empty.
pub struct DuprClient {
    http_client: Client,
    base_url: String,
    debug: bool,
    store: SessionStore,
    session: Session,
}

impl DuprClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            debug: config.debug,
            store: SessionStore::new(config.session_path),
            session: Session::default(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    /// Absolute URL for a relative path. No escaping is applied.
    pub fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Request with the bearer token attached when one is present.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.request_unauthenticated(method, path);
        if self.session.has_token() {
            builder.bearer_auth(&self.session.access_token)
        } else {
            builder
        }
    }

    /// Request without any credentials.
    pub fn request_unauthenticated(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.build_url(path);
        debug!(%method, url = %url, "Building request");
        self.http_client.request(method, url)
    }

    /// POST a JSON body with the session token and decode the reply wrapper.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        self.log_body(path, body);
        let response = self.request(Method::POST, path).json(body).send().await?;
        let text = self.read_body(path, response).await?;
        self.decode_reply(path, &text)
    }

    /// GET without a token. Used by the player lookup, which the service
    /// serves unauthenticated.
    pub async fn get_unauthenticated<T>(&self, path: &str) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
    {
        let response = self
            .request_unauthenticated(Method::GET, path)
            .send()
            .await?;
        let text = self.read_body(path, response).await?;
        self.decode_reply(path, &text)
    }

    fn log_body<B: Serialize + ?Sized>(&self, path: &str, body: &B) {
        if self.debug {
            debug!(
                path,
                body = %serde_json::to_string(body).unwrap_or_default(),
                "Request body"
            );
        }
    }

    async fn read_body(&self, path: &str, response: Response) -> Result<String> {
        let status = response.status();
        let text = response.text().await?;

        if self.debug {
            debug!(path, status = status.as_u16(), body = %text, "Response body");
        }

        if !status.is_success() {
            return Err(DuprError::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text)
    }

    fn decode_reply<T>(&self, path: &str, text: &str) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Default,
    {
        let reply: ApiResponse<T> = serde_json::from_str(text)?;
        if !reply.status.is_empty() && !reply.is_success() {
            warn!(path, status = %reply.status, message = %reply.message, "Service reported failure");
        }
        Ok(reply)
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Log in and persist the raw login response.
    ///
    /// The response is written to the session file as soon as it parses,
    /// before its status is checked, so a rejected login still replaces the
    /// stored session. A rejection is then reported as
    /// [`DuprError::LoginRejected`] and the in-memory session is left as is.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> Result<Session> {
        info!(email = %credentials.email, "Logging in");

        let response = self
            .request_unauthenticated(Method::POST, LOGIN_PATH)
            .json(&credentials.login_body())
            .send()
            .await
            .map_err(|e| DuprError::Auth(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DuprError::Auth(e.to_string()))?;

        if self.debug {
            debug!(status = status.as_u16(), bytes = body.len(), "Login response received");
        }

        let login: LoginResponse = serde_json::from_slice(&body).map_err(|e| {
            DuprError::Auth(format!("unparseable login response (HTTP {}): {}", status, e))
        })?;

        self.store.save_raw(&body).await?;

        if !login.is_success() {
            warn!(status = %login.status, message = %login.message, "Login rejected");
            return Err(DuprError::LoginRejected {
                message: login.message,
            });
        }
        if !login.result.has_token() {
            warn!("Login succeeded without an access token");
        }

        self.session = login.result.clone();
        info!("Logged in");
        Ok(login.result)
    }

    /// Load the stored session into the client.
    pub async fn load_session(&mut self) -> Result<Session> {
        let session = self.store.load().await?;
        self.session = session.clone();
        Ok(session)
    }

    /// Reuse a stored session when it carries a token, otherwise log in.
    ///
    /// A missing file or an empty token leads to a fresh login; a corrupt
    /// file is returned as an error.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session> {
        match self.load_session().await {
            Ok(session) if session.has_token() => {
                info!("Access token loaded");
                Ok(session)
            }
            Ok(_) => {
                warn!("Stored session has no access token, logging in again");
                self.authenticate(credentials).await
            }
            Err(e) if e.is_session_missing() => {
                info!(error = %e, "No stored session");
                self.authenticate(credentials).await
            }
            Err(e) => Err(e),
        }
    }

    /// Re-read the session file before a fetch.
    ///
    /// A missing file is not an error here: requests go out with whatever
    /// session is already held, and the server decides.
    pub async fn reload_session(&mut self) -> Result<()> {
        match self.load_session().await {
            Ok(_) => Ok(()),
            Err(e) if e.is_session_missing() => {
                warn!(error = %e, "Continuing without stored session");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Fetch a single player profile. No token is sent.
    pub async fn get_player(&self, player_id: &str) -> Result<PlayerProfile> {
        info!(player_id, "Fetching player");
        let reply: ApiResponse<PlayerProfile> =
            self.get_unauthenticated(&player_path(player_id)).await?;
        Ok(reply.result)
    }
}

#[async_trait]
impl PageSource for DuprClient {
    async fn fetch_page(&self, path: &str, request: &PageRequest) -> Result<PageEnvelope> {
        let reply: ApiResponse<PageEnvelope> = self.post_json(path, request).await?;
        if !reply.status.is_empty() && !reply.is_success() {
            return Err(DuprError::ServiceFailure {
                status: reply.status,
                message: reply.message,
            });
        }
        Ok(reply.result)
    }
}
