//! Page fetching with automatic person extraction.
//!
//! Backs the `fetch_page_content` tool: fetch a URL, strip the HTML down
//! to readable text, and run the person extractor over it. The payload
//! carries the page text (truncated) plus the detected persons.
//!
//! Unlike provider search, fetch failures are surfaced to the caller — the
//! tool handler reports them as a failed tool result.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::error::FetchError;
use crate::extract::PersonExtractor;
use crate::types::PersonCandidate;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Characters of page text kept in the payload.
const MAX_CONTENT_CHARS: usize = 4000;

/// A fetched page with extracted person candidates.
#[derive(Debug, Clone, Serialize)]
pub struct FetchedPage {
    /// The URL as requested.
    pub url: String,

    /// Page title, when the document has one.
    pub title: Option<String>,

    /// Readable page text, truncated to ~4 000 characters.
    pub content: String,

    /// Persons detected in the full page text.
    pub potential_persons: Vec<PersonCandidate>,

    /// Number of unique persons found.
    pub persons_found: usize,
}

/// Fetches pages and extracts person candidates from them.
pub struct PageFetcher {
    client: reqwest::Client,
    extractor: PersonExtractor,
    timeout: Duration,
    max_content_chars: usize,
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher {
    /// Create a fetcher with the pattern-based extractor.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            extractor: PersonExtractor::new(),
            timeout: Duration::from_secs(15),
            max_content_chars: MAX_CONTENT_CHARS,
        }
    }

    /// Use a custom person extractor (e.g. with an injected NER strategy).
    pub fn with_extractor(mut self, extractor: PersonExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Set the fetch timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch a page and extract persons from its text.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;

        debug!(url = %url, "fetching page");
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let page = self.page_from_html(url, &html);
        info!(
            url = %url,
            content_chars = page.content.len(),
            persons = page.persons_found,
            "page fetched"
        );
        Ok(page)
    }

    /// Build the payload from already-fetched HTML. Persons are extracted
    /// from the full text; only the payload content is truncated.
    pub fn page_from_html(&self, url: &str, html: &str) -> FetchedPage {
        let title = extract_title(html);
        let text = html_to_text(html);
        let potential_persons = self.extractor.extract(&text);
        let persons_found = potential_persons.len();

        FetchedPage {
            url: url.to_string(),
            title,
            content: truncate_chars(&text, self.max_content_chars),
            potential_persons,
            persons_found,
        }
    }
}

/// Strip HTML down to readable text: drop scripts and styles, flatten
/// tags, decode common entities, collapse whitespace.
fn html_to_text(html: &str) -> String {
    let script_pattern = regex::Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    let style_pattern = regex::Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    let mut text = script_pattern.replace_all(html, " ").to_string();
    text = style_pattern.replace_all(&text, " ").to_string();

    // Block-level closers become line breaks so sentences stay separated.
    let block_pattern =
        regex::Regex::new(r"(?i)</(?:p|div|h[1-6]|li|tr|section|article)>|<br\s*/?>").unwrap();
    text = block_pattern.replace_all(&text, "\n").to_string();

    let tag_pattern = regex::Regex::new(r"<[^>]+>").unwrap();
    text = tag_pattern.replace_all(&text, " ").to_string();

    text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let lines: Vec<String> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}

/// Extract the document title.
fn extract_title(html: &str) -> Option<String> {
    let title_pattern = regex::Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok()?;
    title_pattern
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Truncate to at most `max` characters on a char boundary.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}
