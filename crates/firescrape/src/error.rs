//! Error types for Firescrape

use thiserror::Error;

/// Errors that can occur while resolving credentials or calling Firecrawl
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// No API key in the environment or the config file
    #[error("FIRECRAWL_API_KEY not found in environment or ~/.claude/.env")]
    MissingCredential,

    /// API key cannot be sent as an HTTP header
    #[error("Invalid API key: contains characters not allowed in HTTP headers")]
    InvalidCredential,

    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Search query is blank
    #[error("Missing required parameter: query")]
    EmptyQuery,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete in time
    #[error("Request timed out waiting for Firecrawl")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to Firecrawl")]
    ConnectError(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Firecrawl rejected the request
    #[error("Firecrawl API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Invalid response from Firecrawl: {0}")]
    InvalidResponse(String),
}

impl ScrapeError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout
        } else if err.is_connect() {
            ScrapeError::ConnectError(err)
        } else if err.is_decode() {
            ScrapeError::InvalidResponse(err.to_string())
        } else {
            ScrapeError::RequestError(err.to_string())
        }
    }
}
