//! Roster fetch boundary.
//!
//! The dashboard retrieves its roster with a plain GET against the backend
//! endpoint, which returns the JSON array described in [`crate::source`].
//! A fetch either yields a full roster or fails with a [`FetchError`];
//! there is no per-soldier failure and no retry logic here — the next
//! scheduled tick is the only retry mechanism.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::source::RosterSnapshot;

/// Default roster endpoint served by the backend collaborator.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/soldier_data";

/// Errors that can occur when fetching the roster.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Endpoint answered with a non-success status.
    #[error("roster endpoint returned status {0}")]
    Status(u16),

    /// Failed to parse the response body.
    #[error("failed to parse roster: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for a response.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

/// Boundary trait for retrieving one roster snapshot.
///
/// The scheduler drives implementations of this trait; tests substitute
/// their own.
#[async_trait]
pub trait RosterFetcher: Send + Sync {
    /// Fetch the current roster, or fail with a [`FetchError`].
    async fn fetch_roster(&self) -> Result<RosterSnapshot, FetchError>;
}

/// HTTP roster fetcher backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpRosterFetcher {
    client: Client,
    endpoint: String,
}

impl HttpRosterFetcher {
    /// Create a new builder for configuring the fetcher.
    pub fn builder() -> HttpRosterFetcherBuilder {
        HttpRosterFetcherBuilder::default()
    }

    /// Returns the endpoint this fetcher queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RosterFetcher for HttpRosterFetcher {
    async fn fetch_roster(&self) -> Result<RosterSnapshot, FetchError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let roster: RosterSnapshot = response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        Ok(roster)
    }
}

/// Builder for [`HttpRosterFetcher`].
#[derive(Debug, Default)]
pub struct HttpRosterFetcherBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
}

impl HttpRosterFetcherBuilder {
    /// Set the roster endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the fetcher.
    pub fn build(self) -> HttpRosterFetcher {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        HttpRosterFetcher {
            client,
            endpoint: self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let fetcher = HttpRosterFetcher::builder().build();
        assert_eq!(fetcher.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_builder_custom_endpoint() {
        let fetcher = HttpRosterFetcher::builder()
            .endpoint("http://base.local:5000/api/soldier_data")
            .timeout(Duration::from_secs(2))
            .build();
        assert_eq!(fetcher.endpoint(), "http://base.local:5000/api/soldier_data");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FetchError::Status(503).to_string(),
            "roster endpoint returned status 503"
        );
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
    }
}
