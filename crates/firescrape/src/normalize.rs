//! Rendering of API responses as text

use crate::convert::html_to_text;
use crate::types::{ScrapeDocument, ScrapeFormat, SearchResultItem};

/// Output for a search without results
pub const NO_RESULTS: &str = "No results found.";

/// Title used when a result has none
const UNTITLED: &str = "Untitled";

/// Separator between rendered search results
const RESULT_SEPARATOR: &str = "\n\n---\n\n";

/// Render a scraped page
///
/// Non-empty markdown wins, then non-empty HTML (stripped to plain text for
/// [`ScrapeFormat::Text`]). Anything else is printed as the whole document in
/// pretty JSON, so a successful scrape always produces some output.
pub fn normalize_scrape(document: &ScrapeDocument, format: ScrapeFormat) -> String {
    if let Some(markdown) = non_empty(&document.markdown) {
        return markdown.to_string();
    }

    if let Some(html) = non_empty(&document.html) {
        return match format {
            ScrapeFormat::Text => html_to_text(html),
            ScrapeFormat::Markdown | ScrapeFormat::Html => html.to_string(),
        };
    }

    serde_json::to_string_pretty(document).unwrap_or_default()
}

/// Render search results as `##` sections separated by `---`
pub fn normalize_search(items: &[SearchResultItem]) -> String {
    if items.is_empty() {
        return NO_RESULTS.to_string();
    }

    items
        .iter()
        .map(render_item)
        .collect::<Vec<_>>()
        .join(RESULT_SEPARATOR)
}

fn render_item(item: &SearchResultItem) -> String {
    format!(
        "## {}\n**URL:** {}\n\n{}",
        item.title.as_deref().unwrap_or(UNTITLED),
        item.url.as_deref().unwrap_or(""),
        item.excerpt.as_deref().unwrap_or("")
    )
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
