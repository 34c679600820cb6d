//! Google results-page scraper — the last-resort provider.
//!
//! The public results page has no stable markup, so parsing tries several
//! CSS-selector strategies in priority order and keeps whatever matches
//! first. Output is capped at the first 5 usable result blocks.

use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::types::{SearchOptions, SearchResult};

const SEARCH_URL: &str = "https://www.google.com/search";
const MAX_RESULTS: usize = 5;

// Selector strategies, tried in order until one matches.
const RESULT_SELECTORS: [&str; 4] = ["div.g", "div[data-ved]", ".g", ".tF2Cxc"];
const TITLE_SELECTORS: [&str; 3] = ["h3", ".LC20lb", ".DKV0Md"];
const SNIPPET_SELECTORS: [&str; 4] = [".aCOpRe", ".VwiC3b", ".s3v9rd", ".st"];

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Scraping provider. Keyless and always available; use sparingly.
pub struct GoogleScraperProvider {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for GoogleScraperProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleScraperProvider {
    pub const NAME: &'static str = "google_scraper";

    /// Create a new scraping provider.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Always available as the last option.
    pub fn is_available(&self) -> bool {
        true
    }

    /// Scrape the results page. Any failure yields empty results; this
    /// provider never signals a rate limit.
    pub async fn search(
        &self,
        query: &str,
        _options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let html = match self.request(query).await {
            Ok(html) => html,
            Err(err) => {
                warn!(provider = Self::NAME, error = %err, "search failed");
                return Ok(vec![]);
            }
        };

        let results = parse_results(&html);
        if results.is_empty() {
            warn!(provider = Self::NAME, "no search result containers found");
        } else {
            info!(provider = Self::NAME, results = results.len(), "search succeeded");
        }
        Ok(results)
    }

    async fn request(&self, query: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(SEARCH_URL)
            .header("User-Agent", USER_AGENT)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "nl-NL,nl;q=0.9,en;q=0.8")
            .query(&[("q", query), ("hl", "nl")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ProviderError::http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(ProviderError::decode)
    }
}

/// Parse a results page into at most [`MAX_RESULTS`] results.
///
/// Blocks lacking a non-empty title or a link are discarded; redirect-
/// wrapped links are unwrapped to the real destination.
fn parse_results(html: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(html);

    let mut blocks: Vec<ElementRef> = vec![];
    for strategy in RESULT_SELECTORS {
        let selector = Selector::parse(strategy).unwrap();
        blocks = document.select(&selector).collect();
        if !blocks.is_empty() {
            break;
        }
    }

    let mut results = Vec::new();
    for block in blocks {
        if results.len() >= MAX_RESULTS {
            break;
        }

        let Some(title) = first_text(&block, &TITLE_SELECTORS) else {
            continue;
        };
        let Some(href) = first_href(&block) else {
            continue;
        };

        let snippet = first_text(&block, &SNIPPET_SELECTORS).unwrap_or_default();
        let link = unwrap_redirect(&href);

        results.push(SearchResult::new(title, snippet, link, GoogleScraperProvider::NAME));
    }

    results
}

/// First non-empty text content matching any of the selectors, in order.
fn first_text(block: &ElementRef, selectors: &[&str]) -> Option<String> {
    for strategy in selectors {
        let selector = Selector::parse(strategy).unwrap();
        if let Some(el) = block.select(&selector).next() {
            let text = el.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First link target inside the block.
fn first_href(block: &ElementRef) -> Option<String> {
    let selector = Selector::parse("a[href]").unwrap();
    block
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|h| h.to_string())
}

/// Unwrap `/url?q=…` redirect links to the real destination URL.
fn unwrap_redirect(href: &str) -> String {
    if !href.starts_with("/url?") {
        return href.to_string();
    }

    let absolute = format!("https://www.google.com{}", href);
    match url::Url::parse(&absolute) {
        Ok(parsed) => parsed
            .query_pairs()
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| href.to_string()),
        Err(_) => href.to_string(),
    }
}
