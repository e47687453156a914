//! Request and response types for the Firecrawl API

use crate::SEARCH_LIMIT;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Output format requested for a scrape
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrapeFormat {
    /// Markdown rendered by Firecrawl
    #[default]
    Markdown,
    /// Cleaned HTML
    Html,
    /// Plain text extracted locally from the HTML
    Text,
}

impl ScrapeFormat {
    /// Formats to ask the API to populate
    ///
    /// Firecrawl has no plain text format, so `Text` asks for HTML and
    /// strips it after the response arrives.
    pub fn api_formats(self) -> &'static [&'static str] {
        match self {
            ScrapeFormat::Markdown => &["markdown"],
            ScrapeFormat::Html | ScrapeFormat::Text => &["html"],
        }
    }
}

impl std::fmt::Display for ScrapeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeFormat::Markdown => write!(f, "markdown"),
            ScrapeFormat::Html => write!(f, "html"),
            ScrapeFormat::Text => write!(f, "text"),
        }
    }
}

/// Body of `POST /v1/scrape`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest {
    /// Page to scrape
    pub url: String,
    /// Formats Firecrawl should return
    pub formats: Vec<String>,
}

impl ScrapeRequest {
    /// Create a request for the given URL and output format
    pub fn new(url: impl Into<String>, format: ScrapeFormat) -> Self {
        Self {
            url: url.into(),
            formats: format.api_formats().iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Body of `POST /v1/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Search query
    pub query: String,
    /// Maximum number of results
    pub limit: u32,
}

impl SearchRequest {
    /// Create a request with the default result limit
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: SEARCH_LIMIT,
        }
    }

    /// Override the result limit
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Scraped page as returned in the `data` field of a scrape response
///
/// Only `markdown` and `html` are interpreted. Everything else (metadata,
/// links, warnings) is kept so the JSON fallback can print it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeDocument {
    /// Markdown content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,

    /// HTML content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Remaining fields of the payload
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Page details nested under `metadata` in scraped documents
///
/// Page meta tags can repeat, so Firecrawl sometimes sends a list where a
/// string is expected. Each field takes the first string in that case and
/// ignores any other type, so one odd field never drops the whole hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, rename = "sourceURL", deserialize_with = "lenient_string")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
}

/// A string, or the first string of a list; anything else is `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Array(items) => items.into_iter().find_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        }),
        _ => None,
    })
}

/// One search hit in either of the shapes Firecrawl returns
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawSearchItem {
    /// Hit that was also scraped: page details live under `metadata`
    Document {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        markdown: Option<String>,
        metadata: DocumentMetadata,
    },
    /// Plain hit with flat fields
    Entry {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        markdown: Option<String>,
    },
}

/// Search response `data`, or the whole body when there is no envelope
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SearchPayload {
    /// Results as a flat list
    List(Vec<RawSearchItem>),
    /// Results grouped by source; only web results are used
    Grouped {
        #[serde(default)]
        web: Vec<RawSearchItem>,
    },
}

impl SearchPayload {
    /// Canonical items in API order
    pub fn into_items(self) -> Vec<SearchResultItem> {
        let raw = match self {
            SearchPayload::List(items) => items,
            SearchPayload::Grouped { web } => web,
        };
        raw.into_iter().map(SearchResultItem::from).collect()
    }
}

/// Canonical search result used for rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResultItem {
    /// Page title
    pub title: Option<String>,

    /// Page URL
    pub url: Option<String>,

    /// Markdown content, or the description when no markdown was returned
    pub excerpt: Option<String>,
}

impl SearchResultItem {
    /// Create an empty item
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the excerpt
    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }
}

impl From<RawSearchItem> for SearchResultItem {
    fn from(raw: RawSearchItem) -> Self {
        match raw {
            RawSearchItem::Document {
                title,
                url,
                description,
                markdown,
                metadata,
            } => Self {
                title: title.or(metadata.title),
                url: url.or(metadata.source_url).or(metadata.url),
                excerpt: prefer_markdown(markdown, description.or(metadata.description)),
            },
            RawSearchItem::Entry {
                title,
                url,
                description,
                markdown,
            } => Self {
                title,
                url,
                excerpt: prefer_markdown(markdown, description),
            },
        }
    }
}

fn prefer_markdown(markdown: Option<String>, description: Option<String>) -> Option<String> {
    markdown.filter(|m| !m.is_empty()).or(description)
}
