//! Authenticated HTTP client for the scheduling backend.
//!
//! A single [`ApiClient`] is built per process from [`Config`] and shared by
//! every repository. It attaches the stored bearer token to each request,
//! logs every exchange, and clears the session when the server answers 401.
//! A 403 leaves the session alone so a role mismatch stays visible.

pub mod endpoint;
pub mod messages;

use std::time::Instant;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{self, SharedSession};

pub use endpoint::Endpoint;
pub use messages::StatusMessages;

/// Raw outcome of one exchange: status plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    /// Build a response by hand.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Body text as received.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Pass 2xx through; map anything else to [`Error::Api`] with the
    /// message from `messages`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] for a non-success status.
    pub fn ensure_success(self, messages: &StatusMessages) -> Result<Self> {
        if self.status.is_success() {
            return Ok(self);
        }
        Err(Error::api(
            self.status.as_u16(),
            messages.message_for(self.status),
        ))
    }

    /// Decode the body; an empty or `null` body yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the body is not the expected shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let trimmed = self.body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(trimmed)?))
    }

    /// Decode a list body; an empty or `null` body is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the body is not a list of `T`.
    pub fn json_list<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        Ok(self.json()?.unwrap_or_default())
    }
}

/// Shared, token-injecting HTTP client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    session: SharedSession,
}

impl ApiClient {
    /// Build the client with the configured base URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &Config, session: SharedSession) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sidang/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            base_url: config.base_url()?,
            http,
            session,
        })
    }

    /// Send a request without a body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] when no response arrives.
    pub async fn send(&self, endpoint: &Endpoint) -> Result<ApiResponse> {
        self.execute(endpoint, None::<&()>).await
    }

    /// Send a request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] when no response arrives.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<ApiResponse> {
        self.execute(endpoint, Some(body)).await
    }

    /// `GET health`, returning the server's JSON object as-is.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, or an
    /// empty body.
    pub async fn health(&self) -> Result<serde_json::Value> {
        self.send(&Endpoint::Health)
            .await?
            .ensure_success(&StatusMessages::GENERIC)?
            .json()?
            .ok_or_else(|| Error::empty_response("Response kosong dari server"))
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let url = endpoint.url(&self.base_url)?;
        let method = endpoint.method();

        // The guard must not be held across the await below.
        let token = session::lock(&self.session)?.token()?;

        let mut request = self.http.request(method.clone(), url.clone());
        match &token {
            Some(token) => {
                debug!("Attaching bearer token ({} chars)", token.len());
                request = request.bearer_auth(token);
            }
            None => warn!("No session token; sending {} unauthenticated", endpoint),
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!("-> {} {}", method, url);
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let elapsed = started.elapsed();

        self.after_response(endpoint, status, &text, elapsed.as_millis())?;

        Ok(ApiResponse::new(status, text))
    }

    /// Response logging plus the auth-failure policy.
    fn after_response(
        &self,
        endpoint: &Endpoint,
        status: StatusCode,
        body: &str,
        elapsed_ms: u128,
    ) -> Result<()> {
        match status.as_u16() {
            200..=299 => debug!("<- {} {} ({} ms)", status, endpoint, elapsed_ms),
            401 => {
                error!("<- {} {} ({} ms): {}", status, endpoint, elapsed_ms, body);
                session::lock(&self.session)?.logout()?;
                warn!("Session cleared after 401");
            }
            403 => {
                error!(
                    "<- {} {} ({} ms), session kept: {}",
                    status, endpoint, elapsed_ms, body
                );
            }
            400..=499 => warn!("<- {} {} ({} ms)", status, endpoint, elapsed_ms),
            500..=599 => error!("<- {} {} ({} ms)", status, endpoint, elapsed_ms),
            _ => warn!(
                "<- unexpected {} {} ({} ms)",
                status, endpoint, elapsed_ms
            ),
        }
        Ok(())
    }
}
