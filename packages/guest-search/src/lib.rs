//! Multi-Provider Guest Search Library
//!
//! Search-and-extraction pipeline for finding Dutch AI-expert podcast
//! guest candidates: a fallback chain across several search backends with
//! rate-limit detection, session-scoped provider suspension, 24-hour
//! result caching, and best-effort person-name extraction from fetched
//! pages.
//!
//! # Design Philosophy
//!
//! - Providers are tried strictly in priority order; quality and cost
//!   differ, so there is no concurrent fan-out.
//! - The orchestrator is the error-containment boundary: callers see a
//!   populated result set or an explicit empty one, never a provider
//!   failure.
//! - Cache entries are provider-agnostic — the caller cares about getting
//!   *an* answer for a query, not which backend answered it.
//! - All configuration is explicit; the library never reads the
//!   environment on its own.
//!
//! # Usage
//!
//! ```rust,ignore
//! use guest_search::{SearchConfig, SearchOptions, SmartSearch};
//!
//! let config = SearchConfig::from_env();
//! let search = SmartSearch::new(config).await;
//!
//! let response = search.search("Nederlandse AI-hoogleraar 2025", &SearchOptions::default()).await;
//! for result in &response.results {
//!     println!("{} — {}", result.title, result.link);
//! }
//! ```
//!
//! # Modules
//!
//! - [`orchestrator`] - Fallback/skip/cache policy over the provider list
//! - [`providers`] - Search backends and the instance directory
//! - [`cache`] - Durable result cache with TTL
//! - [`extract`] - Person-name extraction strategies and filtering
//! - [`fetch`] - Page fetching with automatic extraction
//! - [`history`] - Previously-recommended guest tracking
//! - [`testing`] - Mock provider for tests

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod history;
pub mod orchestrator;
pub mod providers;
pub mod security;
pub mod testing;
pub mod types;

// Re-export core types at crate root
pub use error::{
    CacheError, DirectoryError, FetchError, HistoryError, ProviderError, RecognizerUnavailable,
};
pub use types::{PersonCandidate, SearchOptions, SearchResponse, SearchResult, StatusReport};

pub use cache::{CacheStats, ResultCache, CACHE_PROVIDER_TAG};
pub use config::SearchConfig;
pub use orchestrator::{SmartSearch, CACHED_PROVIDER};

// Re-export providers
pub use providers::{
    BraveProvider, GoogleScraperProvider, InstanceDirectory, Provider, SearxngProvider,
    SerperProvider, FALLBACK_INSTANCES,
};

// Re-export extraction and fetch
pub use extract::{NameRecognizer, PatternRecognizer, PersonExtractor, MAX_PERSONS};
pub use fetch::{FetchedPage, PageFetcher};
pub use history::{GuestHistory, PreviousGuest, RecentRecommendation};

pub use security::SecretString;

// Re-export testing utilities
pub use testing::{MockBehavior, MockProvider};
