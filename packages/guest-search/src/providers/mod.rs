//! Search provider backends.
//!
//! Providers form a closed set of tagged variants behind the [`Provider`]
//! enum rather than trait objects: the orchestrator iterates one ordered
//! list, and adding a backend means adding a variant — no orchestrator
//! logic changes, and dispatch stays statically checkable.
//!
//! # Failure contract
//!
//! Every variant's `search()` distinguishes two outcomes:
//!
//! - HTTP 402/429 from the backend → `Err(ProviderError::RateLimited)`,
//!   which the orchestrator turns into a session-scoped suspension.
//! - Anything else that goes wrong (network error, timeout, decode failure,
//!   unexpected status) → `Ok(vec![])` plus a log line. "Empty with no
//!   signal" means "try the next provider, but don't blacklist this one."

pub mod brave;
pub mod instances;
pub mod scraper;
pub mod searxng;
pub mod serper;

pub use brave::BraveProvider;
pub use instances::{InstanceDirectory, FALLBACK_INSTANCES};
pub use scraper::GoogleScraperProvider;
pub use searxng::SearxngProvider;
pub use serper::SerperProvider;

use crate::error::ProviderError;
use crate::testing::MockProvider;
use crate::types::{SearchOptions, SearchResult};

/// A search backend, dispatched by the orchestrator in priority order.
pub enum Provider {
    /// Primary paid API (best snippet quality).
    Serper(SerperProvider),

    /// Free community-instance metasearch.
    Searxng(SearxngProvider),

    /// Secondary paid API with self-imposed 1 req/s pacing.
    Brave(BraveProvider),

    /// HTML-scraping last resort.
    Scraper(GoogleScraperProvider),

    /// Scripted provider for tests.
    Mock(MockProvider),
}

impl Provider {
    /// Stable tag identifying this backend. Used as the `source` field of
    /// results and as the key in the session rate-limited set.
    pub fn name(&self) -> &str {
        match self {
            Provider::Serper(_) => SerperProvider::NAME,
            Provider::Searxng(_) => SearxngProvider::NAME,
            Provider::Brave(_) => BraveProvider::NAME,
            Provider::Scraper(_) => GoogleScraperProvider::NAME,
            Provider::Mock(mock) => mock.name(),
        }
    }

    /// Whether the backend can be called at all (credentials configured).
    /// The community-instance and scraping variants are always available.
    pub fn is_available(&self) -> bool {
        match self {
            Provider::Serper(p) => p.is_available(),
            Provider::Searxng(p) => p.is_available(),
            Provider::Brave(p) => p.is_available(),
            Provider::Scraper(p) => p.is_available(),
            Provider::Mock(p) => p.is_available(),
        }
    }

    /// Run one search against this backend.
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        match self {
            Provider::Serper(p) => p.search(query, options).await,
            Provider::Searxng(p) => p.search(query, options).await,
            Provider::Brave(p) => p.search(query, options).await,
            Provider::Scraper(p) => p.search(query, options).await,
            Provider::Mock(p) => p.search(query, options).await,
        }
    }
}
