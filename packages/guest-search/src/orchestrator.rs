//! Search orchestrator with automatic provider fallback.
//!
//! Composes the result cache and the ordered provider list into one
//! `search()` entry point:
//!
//! 1. Cache lookup under the provider-agnostic `"any"` tag.
//! 2. On a miss, providers are tried strictly in priority order —
//!    Serper, SearXNG, Brave, scraper — skipping any suspended or
//!    unavailable backend. The first non-empty answer wins and is cached.
//! 3. A rate-limit signal suspends that provider for the rest of the
//!    session; everything else falls through to the next backend.
//!
//! The orchestrator is the error-containment boundary: callers only ever
//! see a populated result set or an explicit empty one, never a
//! provider-level failure.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::{ResultCache, CACHE_PROVIDER_TAG};
use crate::config::SearchConfig;
use crate::providers::{
    BraveProvider, GoogleScraperProvider, InstanceDirectory, Provider, SearxngProvider,
    SerperProvider,
};
use crate::types::{SearchOptions, SearchResponse, StatusReport};

/// Provider tag reported for cache hits.
pub const CACHED_PROVIDER: &str = "cached";

/// Multi-provider search with fallback, rate-limit suspension, and caching.
pub struct SmartSearch {
    providers: Vec<Provider>,
    cache: RwLock<Option<ResultCache>>,
    cache_path: PathBuf,
    rate_limited: RwLock<HashSet<String>>,
}

impl SmartSearch {
    /// Build the standard provider stack from configuration.
    ///
    /// Key-gated providers are only added when their credential is
    /// configured. Loading the community-instance directory may fetch the
    /// live instance list, hence `async`.
    pub async fn new(config: SearchConfig) -> Self {
        let client = reqwest::Client::new();
        let mut providers = Vec::new();

        if let Some(key) = &config.serper_api_key {
            providers.push(Provider::Serper(
                SerperProvider::new(key.expose()).with_timeout(config.request_timeout),
            ));
        }

        let directory = InstanceDirectory::load(&config.instances_cache_path, &client).await;
        let mut searxng = SearxngProvider::new(directory.instances().to_vec())
            .with_timeout(config.request_timeout);
        if let Some(instance) = &config.searxng_instance {
            searxng = searxng.with_instance(instance.clone());
        }
        providers.push(Provider::Searxng(searxng));

        if let Some(key) = &config.brave_api_key {
            providers.push(Provider::Brave(
                BraveProvider::new(key.expose()).with_timeout(config.request_timeout),
            ));
        }

        providers.push(Provider::Scraper(
            GoogleScraperProvider::new().with_timeout(config.request_timeout),
        ));

        info!(providers = providers.len(), "smart search initialized");
        Self::with_providers(providers, config)
    }

    /// Assemble an orchestrator from an explicit provider list.
    ///
    /// Used by tests and by callers with a custom stack; the list order is
    /// the fallback priority order.
    pub fn with_providers(providers: Vec<Provider>, config: SearchConfig) -> Self {
        let cache = config
            .cache_enabled
            .then(|| ResultCache::open(&config.cache_path));

        Self {
            providers,
            cache: RwLock::new(cache),
            cache_path: config.cache_path,
            rate_limited: RwLock::new(HashSet::new()),
        }
    }

    /// Run a search with fallback and caching.
    ///
    /// Never fails: when every provider is exhausted the response carries
    /// `provider: None` and empty results.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        if let Some(results) = self.cache_lookup(query, options) {
            return SearchResponse {
                query: query.to_string(),
                provider: Some(CACHED_PROVIDER.to_string()),
                results,
                cache_hit: true,
                timestamp: Utc::now(),
            };
        }

        for provider in &self.providers {
            let name = provider.name();

            if self.rate_limited.read().unwrap().contains(name) {
                info!(provider = name, "skipping provider, rate limited this session");
                continue;
            }
            if !provider.is_available() {
                debug!(provider = name, "provider not available");
                continue;
            }

            info!(provider = name, query = %query, "trying provider");
            match provider.search(query, options).await {
                Ok(results) if !results.is_empty() => {
                    info!(provider = name, results = results.len(), "provider succeeded");
                    if let Some(cache) = self.cache.read().unwrap().as_ref() {
                        cache.put(query, CACHE_PROVIDER_TAG, &results, options);
                    }
                    return SearchResponse {
                        query: query.to_string(),
                        provider: Some(name.to_string()),
                        results,
                        cache_hit: false,
                        timestamp: Utc::now(),
                    };
                }
                Ok(_) => {
                    warn!(provider = name, "provider returned no results");
                }
                Err(err) if err.is_rate_limit() => {
                    warn!(provider = name, error = %err, "rate limited, suspending for session");
                    self.rate_limited.write().unwrap().insert(name.to_string());
                }
                Err(err) => {
                    warn!(provider = name, error = %err, "provider failed");
                }
            }
        }

        SearchResponse {
            query: query.to_string(),
            provider: None,
            results: vec![],
            cache_hit: false,
            timestamp: Utc::now(),
        }
    }

    fn cache_lookup(&self, query: &str, options: &SearchOptions) -> Option<Vec<crate::types::SearchResult>> {
        let cache = self.cache.read().unwrap();
        let results = cache.as_ref()?.get(query, CACHE_PROVIDER_TAG, options)?;
        (!results.is_empty()).then_some(results)
    }

    /// Snapshot of configured providers, suspensions, and cache stats.
    pub fn status(&self) -> StatusReport {
        let mut rate_limited: Vec<String> =
            self.rate_limited.read().unwrap().iter().cloned().collect();
        rate_limited.sort();

        StatusReport {
            providers: self.providers.iter().map(|p| p.name().to_string()).collect(),
            rate_limited_providers: rate_limited,
            cache: self.cache.read().unwrap().as_ref().map(|c| c.stats()),
        }
    }

    /// Clear the session's rate-limit suspensions. Intended for the start
    /// of a new agent run.
    pub fn reset_rate_limits(&self) {
        self.rate_limited.write().unwrap().clear();
        info!("rate limit tracking reset");
    }

    /// Turn off result caching for this orchestrator.
    pub fn disable_cache(&self) {
        *self.cache.write().unwrap() = None;
        info!("search result caching disabled");
    }

    /// Re-enable result caching at the configured path.
    pub fn enable_cache(&self) {
        let mut cache = self.cache.write().unwrap();
        if cache.is_none() {
            *cache = Some(ResultCache::open(&self.cache_path));
            info!("search result caching enabled");
        }
    }

    /// Format a response as the human-readable block handed to the agent
    /// loop: top 5 results with title, snippet, and URL.
    pub fn render_results(response: &SearchResponse) -> String {
        if response.results.is_empty() {
            return format!("No results found for '{}'", response.query);
        }

        let provider = response.provider.as_deref().unwrap_or("unknown");
        let mut out = format!(
            "Search results for '{}' (via {}):\n\n",
            response.query, provider
        );
        for (i, result) in response.results.iter().take(5).enumerate() {
            out.push_str(&format!(
                "{}. {}\n   {}\n   URL: {}\n\n",
                i + 1,
                result.title,
                result.snippet,
                result.link
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_results, MockProvider};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_cache_path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "guest-search-orchestrator-test-{}-{}.json",
            std::process::id(),
            n
        ))
    }

    fn test_config() -> SearchConfig {
        SearchConfig::new().with_cache_path(temp_cache_path())
    }

    fn uncached_config() -> SearchConfig {
        test_config().with_cache_enabled(false)
    }

    #[tokio::test]
    async fn first_successful_provider_wins_and_is_cached() {
        let provider_a = MockProvider::returning("provider_a", sample_results("provider_a", 3));
        let orchestrator = SmartSearch::with_providers(
            vec![Provider::Mock(provider_a)],
            test_config(),
        );

        let response = orchestrator
            .search("AI Netherlands 2024", &SearchOptions::default())
            .await;

        assert_eq!(response.provider.as_deref(), Some("provider_a"));
        assert_eq!(response.results.len(), 3);
        assert!(!response.cache_hit);

        // Repeat within the TTL: served from cache, provider untouched.
        let repeat = orchestrator
            .search("AI Netherlands 2024", &SearchOptions::default())
            .await;
        assert!(repeat.cache_hit);
        assert_eq!(repeat.provider.as_deref(), Some("cached"));
        assert_eq!(repeat.results.len(), 3);
    }

    #[tokio::test]
    async fn cache_hit_invokes_no_provider() {
        let seed = MockProvider::returning("seed", sample_results("seed", 2));
        let orchestrator =
            SmartSearch::with_providers(vec![Provider::Mock(seed)], test_config());
        orchestrator.search("query", &SearchOptions::default()).await;

        let untouched = MockProvider::returning("untouched", sample_results("untouched", 1));
        let calls = untouched.calls_handle();
        let second = SmartSearch::with_providers(
            vec![Provider::Mock(untouched)],
            SearchConfig::new().with_cache_path(orchestrator.cache_path.clone()),
        );

        let response = second.search("query", &SearchOptions::default()).await;
        assert!(response.cache_hit);
        assert!(calls.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rate_limited_provider_falls_through_and_is_suspended() {
        let limited = MockProvider::rate_limited("provider_a");
        let limited_calls = limited.calls_handle();
        let healthy = MockProvider::returning("provider_b", sample_results("provider_b", 2));

        let orchestrator = SmartSearch::with_providers(
            vec![Provider::Mock(limited), Provider::Mock(healthy)],
            uncached_config(),
        );

        let response = orchestrator.search("query 1", &SearchOptions::default()).await;
        assert_eq!(response.provider.as_deref(), Some("provider_b"));
        assert_eq!(response.results.len(), 2);

        let status = orchestrator.status();
        assert_eq!(status.rate_limited_providers, vec!["provider_a".to_string()]);

        // Second search skips the suspended provider entirely.
        orchestrator.search("query 2", &SearchOptions::default()).await;
        assert_eq!(limited_calls.read().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fallback_stops_at_the_first_non_empty_provider() {
        let p1 = MockProvider::rate_limited("p1");
        let p2 = MockProvider::returning("p2", sample_results("p2", 1));
        let p3 = MockProvider::returning("p3", sample_results("p3", 1));
        let p3_calls = p3.calls_handle();

        let orchestrator = SmartSearch::with_providers(
            vec![
                Provider::Mock(p1),
                Provider::Mock(p2),
                Provider::Mock(p3),
            ],
            uncached_config(),
        );

        let response = orchestrator.search("query", &SearchOptions::default()).await;
        assert_eq!(response.provider.as_deref(), Some("p2"));
        assert!(p3_calls.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_providers_fall_through_without_suspension() {
        let empty = MockProvider::empty("empty_one");
        let next = MockProvider::returning("next", sample_results("next", 1));

        let orchestrator = SmartSearch::with_providers(
            vec![Provider::Mock(empty), Provider::Mock(next)],
            uncached_config(),
        );

        let response = orchestrator.search("query", &SearchOptions::default()).await;
        assert_eq!(response.provider.as_deref(), Some("next"));
        assert!(orchestrator.status().rate_limited_providers.is_empty());
    }

    #[tokio::test]
    async fn unavailable_providers_are_skipped_without_a_call() {
        let keyless = MockProvider::returning("keyless", sample_results("keyless", 1)).unavailable();
        let calls = keyless.calls_handle();
        let next = MockProvider::returning("next", sample_results("next", 1));

        let orchestrator = SmartSearch::with_providers(
            vec![Provider::Mock(keyless), Provider::Mock(next)],
            uncached_config(),
        );

        let response = orchestrator.search("query", &SearchOptions::default()).await;
        assert_eq!(response.provider.as_deref(), Some("next"));
        assert!(calls.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn all_exhausted_is_a_normal_empty_response() {
        let orchestrator = SmartSearch::with_providers(
            vec![
                Provider::Mock(MockProvider::empty("a")),
                Provider::Mock(MockProvider::rate_limited("b")),
                Provider::Mock(MockProvider::failing("c")),
            ],
            uncached_config(),
        );

        let response = orchestrator.search("query", &SearchOptions::default()).await;
        assert!(response.provider.is_none());
        assert!(response.results.is_empty());
        assert!(!response.cache_hit);
    }

    #[tokio::test]
    async fn reset_rate_limits_re_enables_suspended_providers() {
        let limited = MockProvider::rate_limited("flaky");
        let calls = limited.calls_handle();

        let orchestrator =
            SmartSearch::with_providers(vec![Provider::Mock(limited)], uncached_config());

        orchestrator.search("q1", &SearchOptions::default()).await;
        orchestrator.search("q2", &SearchOptions::default()).await;
        assert_eq!(calls.read().unwrap().len(), 1);

        orchestrator.reset_rate_limits();
        assert!(orchestrator.status().rate_limited_providers.is_empty());

        orchestrator.search("q3", &SearchOptions::default()).await;
        assert_eq!(calls.read().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn disabled_cache_always_queries_providers() {
        let provider = MockProvider::returning("p", sample_results("p", 1));
        let calls = provider.calls_handle();

        let orchestrator =
            SmartSearch::with_providers(vec![Provider::Mock(provider)], test_config());
        orchestrator.disable_cache();

        orchestrator.search("query", &SearchOptions::default()).await;
        orchestrator.search("query", &SearchOptions::default()).await;

        assert_eq!(calls.read().unwrap().len(), 2);
        assert!(orchestrator.status().cache.is_none());
    }

    #[tokio::test]
    async fn status_lists_providers_in_priority_order() {
        let orchestrator = SmartSearch::with_providers(
            vec![
                Provider::Mock(MockProvider::empty("first")),
                Provider::Mock(MockProvider::empty("second")),
            ],
            uncached_config(),
        );

        let status = orchestrator.status();
        assert_eq!(status.providers, vec!["first".to_string(), "second".to_string()]);
        assert!(status.cache.is_none());
    }

    #[test]
    fn render_results_formats_the_top_five() {
        let response = SearchResponse {
            query: "AI experts".to_string(),
            provider: Some("serper".to_string()),
            results: sample_results("serper", 7),
            cache_hit: false,
            timestamp: Utc::now(),
        };

        let rendered = SmartSearch::render_results(&response);
        assert!(rendered.contains("via serper"));
        assert!(rendered.contains("5. Result 4"));
        assert!(!rendered.contains("Result 5"));
    }

    #[test]
    fn render_results_reports_empty_responses() {
        let response = SearchResponse {
            query: "niets".to_string(),
            provider: None,
            results: vec![],
            cache_hit: false,
            timestamp: Utc::now(),
        };

        assert_eq!(
            SmartSearch::render_results(&response),
            "No results found for 'niets'"
        );
    }
}
