//! Explicit configuration for the search pipeline.
//!
//! All credentials, paths, and toggles are passed into the orchestrator's
//! constructor — the library never reads the environment or loads dotenv
//! files on its own. `SearchConfig::from_env()` is a convenience for the
//! binary edge.

use std::path::PathBuf;
use std::time::Duration;

use crate::security::SecretString;

/// Default location of the durable search-result cache.
pub const DEFAULT_CACHE_PATH: &str = "data/cache/search_results.json";

/// Default location of the community-instance directory cache.
pub const DEFAULT_INSTANCES_CACHE_PATH: &str = "data/cache/searxng_instances.json";

/// Configuration for [`SmartSearch`](crate::SmartSearch).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// API key for the primary paid provider (Serper).
    pub serper_api_key: Option<SecretString>,

    /// API key for the secondary paid provider (Brave).
    pub brave_api_key: Option<SecretString>,

    /// Pin the community-instance provider to a specific instance URL
    /// instead of the discovered directory head.
    pub searxng_instance: Option<String>,

    /// Whether search results are cached.
    pub cache_enabled: bool,

    /// Path of the durable result cache.
    pub cache_path: PathBuf,

    /// Path of the instance-directory cache.
    pub instances_cache_path: PathBuf,

    /// Per-request HTTP timeout for provider calls.
    pub request_timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            serper_api_key: None,
            brave_api_key: None,
            searxng_instance: None,
            cache_enabled: true,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            instances_cache_path: PathBuf::from(DEFAULT_INSTANCES_CACHE_PATH),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl SearchConfig {
    /// Create a config with default values and no credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read credentials from the process environment.
    ///
    /// Honors `SERPER_API_KEY`, `BRAVE_API_KEY`, and `SEARXNG_INSTANCE`.
    /// Missing keys leave the matching provider unavailable, not erroring.
    pub fn from_env() -> Self {
        let non_empty = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
        };

        Self {
            serper_api_key: non_empty("SERPER_API_KEY").map(SecretString::new),
            brave_api_key: non_empty("BRAVE_API_KEY").map(SecretString::new),
            searxng_instance: non_empty("SEARXNG_INSTANCE"),
            ..Self::default()
        }
    }

    /// Set the Serper API key.
    pub fn with_serper_api_key(mut self, key: impl Into<String>) -> Self {
        self.serper_api_key = Some(SecretString::new(key));
        self
    }

    /// Set the Brave API key.
    pub fn with_brave_api_key(mut self, key: impl Into<String>) -> Self {
        self.brave_api_key = Some(SecretString::new(key));
        self
    }

    /// Pin the community-instance provider to one instance.
    pub fn with_searxng_instance(mut self, url: impl Into<String>) -> Self {
        self.searxng_instance = Some(url.into());
        self
    }

    /// Enable or disable result caching.
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Set the result cache path.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Set the instance-directory cache path.
    pub fn with_instances_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.instances_cache_path = path.into();
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_cache_with_standard_paths() {
        let config = SearchConfig::default();
        assert!(config.cache_enabled);
        assert!(config.serper_api_key.is_none());
        assert_eq!(config.cache_path, PathBuf::from(DEFAULT_CACHE_PATH));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn builder_sets_credentials() {
        let config = SearchConfig::new()
            .with_serper_api_key("sk-serper")
            .with_brave_api_key("sk-brave")
            .with_cache_enabled(false);

        assert_eq!(config.serper_api_key.unwrap().expose(), "sk-serper");
        assert_eq!(config.brave_api_key.unwrap().expose(), "sk-brave");
        assert!(!config.cache_enabled);
    }

    #[test]
    fn debug_output_redacts_keys() {
        let config = SearchConfig::new().with_serper_api_key("sk-very-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
