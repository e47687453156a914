//! Firescrape - Firecrawl scrape and search client
//!
//! This crate wraps two calls of the Firecrawl API, scraping a single URL
//! and searching the web, and turns their responses into plain text that
//! can be printed or handed to an LLM.
//!
//! ## Flow
//!
//! 1. [`resolve_credential`] finds the API key through a [`CredentialSource`]
//! 2. [`FirecrawlClient`] (or any other [`ScrapeApi`]) performs the request
//! 3. [`normalize_scrape`] and [`normalize_search`] render the response
//!
//! [`execute`] runs steps 2 and 3 for a parsed [`Command`].

pub mod client;
mod convert;
pub mod credential;
mod error;
mod normalize;
mod tool;
mod types;

pub use client::{ClientBuilder, FirecrawlClient, ScrapeApi};
pub use convert::html_to_text;
pub use credential::{
    resolve_credential, Credential, CredentialSource, ProcessEnvironment, API_KEY_VAR,
};
pub use error::ScrapeError;
pub use normalize::{normalize_scrape, normalize_search, NO_RESULTS};
pub use tool::{execute, Command};
pub use types::{
    DocumentMetadata, RawSearchItem, ScrapeDocument, ScrapeFormat, ScrapeRequest, SearchPayload,
    SearchRequest, SearchResultItem,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Everruns Firescrape/1.0";

/// Default Firecrawl API base URL
pub const DEFAULT_API_URL: &str = "https://api.firecrawl.dev";

/// Number of results requested per search
pub const SEARCH_LIMIT: u32 = 5;
