//! Search result and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;

/// A single normalized search result.
///
/// Produced by a provider call; immutable once returned. Results keep the
/// provider-native ranking — there is no re-ranking across providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title.
    pub title: String,

    /// Snippet/description from the results page.
    pub snippet: String,

    /// Destination URL.
    pub link: String,

    /// Tag of the provider that produced this result.
    pub source: String,
}

impl SearchResult {
    /// Create a new search result.
    pub fn new(
        title: impl Into<String>,
        snippet: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            link: link.into(),
            source: source.into(),
        }
    }
}

/// Options for a single search request.
///
/// The result-count hint and language are part of the cache key, so two
/// requests that differ in either are cached independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Desired number of results.
    pub num_results: usize,

    /// Language hint passed to providers that support one.
    pub language: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            num_results: 10,
            language: "nl".to_string(),
        }
    }
}

impl SearchOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the desired result count.
    pub fn with_num_results(mut self, n: usize) -> Self {
        self.num_results = n;
        self
    }

    /// Set the language hint.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// Response returned by the orchestrator for one query.
///
/// `provider: None` with empty `results` is the normal all-providers-exhausted
/// value, not an error — callers must handle it explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// The query as issued.
    pub query: String,

    /// Tag of the provider that answered, `"cached"` for a cache hit,
    /// or `None` when every provider came up empty.
    pub provider: Option<String>,

    /// Results in provider-native order.
    pub results: Vec<SearchResult>,

    /// Whether the results came from the cache.
    pub cache_hit: bool,

    /// When the response was assembled.
    pub timestamp: DateTime<Utc>,
}

impl SearchResponse {
    /// Whether no provider produced results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Snapshot of orchestrator state for the status tool.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Configured provider tags, in fallback priority order.
    pub providers: Vec<String>,

    /// Providers suspended for the rest of the session.
    pub rate_limited_providers: Vec<String>,

    /// Cache statistics, absent when caching is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
}
