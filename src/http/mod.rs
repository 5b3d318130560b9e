//! Shared HTTP client for listing fetches and file transfers.
//!
//! One [`HttpClient`] is built per run and cloned into every task so that
//! listing requests and file downloads share a single connection pool.

mod constants;
mod error;

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use error::HttpError;

use crate::user_agent;

/// HTTP client with run-wide timeouts and User-Agent.
///
/// Cloning is cheap: the inner [`reqwest::Client`] is reference counted.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the default timeouts (30s connect, 5min read).
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if the TLS backend or system configuration
    /// cannot be initialised.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values in seconds.
    ///
    /// `read_timeout_secs` limits how long a single read may stall; it resets
    /// whenever data arrives, so there is no deadline on a whole download.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Build`] if the underlying client cannot be built.
    pub fn with_timeouts(
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .map_err(|source| HttpError::Build { source })?;
        Ok(Self { client })
    }

    /// Issues a GET request and rejects non-success statuses.
    ///
    /// The body is left unread so callers can either parse it whole or stream it.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] / [`HttpError::Timeout`] when the request
    /// cannot be completed and [`HttpError::HttpStatus`] for non-2xx responses.
    pub async fn get(&self, url: &Url) -> Result<Response, HttpError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::http_status(url.as_str(), status.as_u16()));
        }
        Ok(response)
    }
}
