//! HTTP client for the Firecrawl API
//!
//! [`ScrapeApi`] is the seam between command execution and the network.
//! [`FirecrawlClient`] implements it against the Firecrawl v1 endpoints and
//! performs exactly one request per call; there are no retries.

use crate::credential::Credential;
use crate::error::ScrapeError;
use crate::types::{ScrapeDocument, ScrapeRequest, SearchPayload, SearchRequest, SearchResultItem};
use crate::{DEFAULT_API_URL, DEFAULT_USER_AGENT};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Scrape endpoint path
const SCRAPE_ENDPOINT: &str = "/v1/scrape";

/// Search endpoint path
const SEARCH_ENDPOINT: &str = "/v1/search";

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Total request timeout; Firecrawl renders pages before answering
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Scrape and search capabilities of the Firecrawl service
#[async_trait]
pub trait ScrapeApi: Send + Sync {
    /// Fetch a single page in the requested formats
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeDocument, ScrapeError>;

    /// Run a web search, returning at most `request.limit` items in rank order
    async fn search(&self, request: &SearchRequest)
        -> Result<Vec<SearchResultItem>, ScrapeError>;
}

/// Builder for [`FirecrawlClient`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: Credential,
    base_url: String,
    user_agent: Option<String>,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a builder using the public Firecrawl API
    pub fn new(api_key: Credential) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_API_URL.to_string(),
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API base URL (self-hosted Firecrawl, test servers)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the total request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<FirecrawlClient, ScrapeError> {
        let mut headers = HeaderMap::new();
        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose()))
            .map_err(|_| ScrapeError::InvalidCredential)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(self.timeout)
            .build()
            .map_err(ScrapeError::ClientBuildError)?;

        Ok(FirecrawlClient {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Firecrawl API client
#[derive(Debug, Clone)]
pub struct FirecrawlClient {
    http: reqwest::Client,
    base_url: String,
}

impl FirecrawlClient {
    /// Create a new client builder
    pub fn builder(api_key: Credential) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Create a client with default settings
    pub fn new(api_key: Credential) -> Result<Self, ScrapeError> {
        Self::builder(api_key).build()
    }

    /// API base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and return the decoded response body
    ///
    /// Non-2xx statuses and `"success": false` bodies become
    /// [`ScrapeError::Api`].
    async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Value, ScrapeError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "Sending Firecrawl request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ScrapeError::from_reqwest)?;

        let status = response.status();
        let text = response.text().await.map_err(ScrapeError::from_reqwest)?;
        let parsed: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = parsed
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            warn!(status = status.as_u16(), error = %message, "Firecrawl request failed");
            return Err(ScrapeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = parsed
            .ok_or_else(|| ScrapeError::InvalidResponse("response body is not JSON".to_string()))?;

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message =
                error_message(&body).unwrap_or_else(|| "request was not successful".to_string());
            warn!(status = status.as_u16(), error = %message, "Firecrawl reported failure");
            return Err(ScrapeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl ScrapeApi for FirecrawlClient {
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeDocument, ScrapeError> {
        validate_url(&request.url)?;

        let body = self.post(SCRAPE_ENDPOINT, request).await?;
        serde_json::from_value(into_data(body))
            .map_err(|e| ScrapeError::InvalidResponse(format!("scrape result: {}", e)))
    }

    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResultItem>, ScrapeError> {
        if request.query.trim().is_empty() {
            return Err(ScrapeError::EmptyQuery);
        }

        let body = self.post(SEARCH_ENDPOINT, request).await?;
        let payload: SearchPayload = serde_json::from_value(into_data(body))
            .map_err(|e| ScrapeError::InvalidResponse(format!("search results: {}", e)))?;

        let mut items = payload.into_items();
        items.truncate(request.limit as usize);
        debug!(count = items.len(), "Received search results");
        Ok(items)
    }
}

/// Reject URLs Firecrawl cannot scrape before spending a request
fn validate_url(url: &str) -> Result<(), ScrapeError> {
    if url.trim().is_empty() {
        return Err(ScrapeError::MissingUrl);
    }

    let parsed = Url::parse(url).map_err(|_| ScrapeError::InvalidUrlScheme)?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ScrapeError::InvalidUrlScheme),
    }
}

/// Unwrap the `{"data": ...}` envelope when present
fn into_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Error text from a Firecrawl error body
fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/path?q=1").is_ok());
        assert!(matches!(validate_url(""), Err(ScrapeError::MissingUrl)));
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(ScrapeError::InvalidUrlScheme)
        ));
        assert!(matches!(
            validate_url("not a url"),
            Err(ScrapeError::InvalidUrlScheme)
        ));
    }

    #[test]
    fn test_into_data() {
        assert_eq!(into_data(json!({"success": true, "data": [1, 2]})), json!([1, 2]));
        assert_eq!(into_data(json!([1, 2])), json!([1, 2]));
        assert_eq!(into_data(json!({"web": []})), json!({"web": []}));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(&json!({"success": false, "error": "Unauthorized"})),
            Some("Unauthorized".to_string())
        );
        assert_eq!(
            error_message(&json!({"message": "Rate limited"})),
            Some("Rate limited".to_string())
        );
        assert_eq!(error_message(&json!({"error": {"code": 1}})), None);
    }

    #[test]
    fn test_builder_trims_base_url() {
        let client = FirecrawlClient::builder(Credential::new("fc-test"))
            .base_url("http://localhost:3002/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3002");
    }

    #[test]
    fn test_default_base_url() {
        let client = FirecrawlClient::new(Credential::new("fc-test")).unwrap();
        assert_eq!(client.base_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_credential() {
        let result = FirecrawlClient::new(Credential::new("bad\nkey"));
        assert!(matches!(result, Err(ScrapeError::InvalidCredential)));
    }

    #[tokio::test]
    async fn test_scrape_rejects_bad_scheme_without_request() {
        let client = FirecrawlClient::builder(Credential::new("fc-test"))
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let req = ScrapeRequest::new("file:///etc/passwd", Default::default());
        assert!(matches!(
            client.scrape(&req).await,
            Err(ScrapeError::InvalidUrlScheme)
        ));
    }

    #[tokio::test]
    async fn test_search_rejects_blank_query() {
        let client = FirecrawlClient::new(Credential::new("fc-test")).unwrap();
        let req = SearchRequest::new("   ");
        assert!(matches!(
            client.search(&req).await,
            Err(ScrapeError::EmptyQuery)
        ));
    }
}
