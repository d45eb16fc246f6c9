//! Typed client for the commerce REST API.
//!
//! [`ApiClient`] wraps `reqwest` with the base URL, the session's bearer
//! token, and response normalization into the [`ApiError`] taxonomy.
//! Endpoint groups live in submodules: [`products`], [`cart`], [`auth`].

pub mod auth;
pub mod cart;
pub mod products;
pub mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;
use crate::session::Session;

/// Errors that can occur when talking to the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No or invalid session credential (HTTP 401). The cart treats this
    /// as "empty cart", not as a failure.
    #[error("unauthenticated")]
    Unauthorized,

    /// Resource not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The server rejected the request payload (HTTP 400/422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Rate limited, retry after the given number of seconds.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A request URL could not be built from the configured base.
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reading a local file for an upload failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Client for the commerce REST API.
///
/// Cheaply cloneable; attaches `Authorization: Bearer <token>` whenever
/// the session holds a credential.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                session,
            }),
        })
    }

    /// The session this client authenticates with.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Build a request for an API path, attaching the bearer credential
    /// when the session holds one.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.join(path)?;
        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header("Accept", "application/json");

        if let Some(token) = self.inner.session.token() {
            builder = builder.bearer_auth(token.expose_secret());
        }

        Ok(builder)
    }

    fn join(&self, path: &str) -> Result<Url, ApiError> {
        // Base URLs are configured with or without a trailing slash;
        // Url::join would drop the last base segment without one.
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Send a request and decode the JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.send_text(builder).await?;
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %text.chars().take(500).collect::<String>(),
                    "Failed to parse API response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }

    /// Send a request, check the status, and discard the body.
    pub(crate) async fn send_unit(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<(), ApiError> {
        self.send_text(builder).await.map(drop)
    }

    /// Send a request and return the body as text after status
    /// normalization. Reading text first keeps the body available for
    /// error diagnostics.
    pub(crate) async fn send_text(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        let text = response.text().await?;

        if status.is_success() {
            return Ok(text);
        }

        let message = extract_message(&text, &status);

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(message)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ApiError::Validation(message))
            }
            _ => {
                tracing::error!(
                    status = %status,
                    body = %text.chars().take(500).collect::<String>(),
                    "API returned non-success status"
                );
                Err(ApiError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Pull a human-readable message out of an error body. Servers respond
/// with `{"message": "..."}`; anything else falls back to the raw text
/// or the status line.
fn extract_message(body: &str, status: &StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("message").and_then(|m| m.as_str())
    {
        return message.to_string();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
