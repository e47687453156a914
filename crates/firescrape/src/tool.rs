//! Command execution

use crate::client::ScrapeApi;
use crate::error::ScrapeError;
use crate::normalize::{normalize_scrape, normalize_search};
use crate::types::{ScrapeFormat, ScrapeRequest, SearchRequest};
use tracing::debug;

/// What a single invocation should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Scrape one URL
    Scrape { url: String, format: ScrapeFormat },
    /// Search the web
    Search { query: String },
}

impl Command {
    /// Scrape `url` and render it in `format`
    pub fn scrape(url: impl Into<String>, format: ScrapeFormat) -> Self {
        Command::Scrape {
            url: url.into(),
            format,
        }
    }

    /// Search for `query`
    pub fn search(query: impl Into<String>) -> Self {
        Command::Search {
            query: query.into(),
        }
    }
}

/// Run a command against the API and return the text to print
///
/// Errors from the API are returned unchanged.
pub async fn execute<A>(api: &A, command: &Command) -> Result<String, ScrapeError>
where
    A: ScrapeApi + ?Sized,
{
    match command {
        Command::Scrape { url, format } => {
            debug!(url = %url, format = %format, "Scraping");
            let request = ScrapeRequest::new(url.as_str(), *format);
            let document = api.scrape(&request).await?;
            Ok(normalize_scrape(&document, *format))
        }
        Command::Search { query } => {
            debug!(query = %query, "Searching");
            let items = api.search(&SearchRequest::new(query.as_str())).await?;
            Ok(normalize_search(&items))
        }
    }
}
