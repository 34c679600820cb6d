//! Testing utilities including a scripted mock provider.
//!
//! Useful for exercising the orchestrator's fallback, caching, and
//! rate-limit policy without network calls.

use std::sync::{Arc, RwLock};

use crate::error::ProviderError;
use crate::types::{SearchOptions, SearchResult};

/// What a [`MockProvider`] does when searched.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return these results.
    Results(Vec<SearchResult>),

    /// Return an empty result set (transient-failure shape).
    Empty,

    /// Signal a rate limit (HTTP 429).
    RateLimited,

    /// Fail with a non-rate-limit error. Concrete providers never surface
    /// this, but the orchestrator must tolerate it anyway.
    Transient,
}

/// A scripted search provider that records the queries it receives.
pub struct MockProvider {
    name: String,
    available: bool,
    behavior: MockBehavior,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockProvider {
    /// A provider that returns the given results for every query.
    pub fn returning(name: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self::with_behavior(name, MockBehavior::Results(results))
    }

    /// A provider that always comes up empty.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::with_behavior(name, MockBehavior::Empty)
    }

    /// A provider that signals a rate limit on every call.
    pub fn rate_limited(name: impl Into<String>) -> Self {
        Self::with_behavior(name, MockBehavior::RateLimited)
    }

    /// A provider that fails with a non-rate-limit error on every call.
    pub fn failing(name: impl Into<String>) -> Self {
        Self::with_behavior(name, MockBehavior::Transient)
    }

    /// Any behavior, explicitly.
    pub fn with_behavior(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            available: true,
            behavior,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Mark the provider as unavailable (missing credentials).
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Handle onto the recorded queries; stays valid after the provider
    /// moves into an orchestrator.
    pub fn calls_handle(&self) -> Arc<RwLock<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    /// Queries received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub async fn search(
        &self,
        query: &str,
        _options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        self.calls.write().unwrap().push(query.to_string());

        match &self.behavior {
            MockBehavior::Results(results) => Ok(results.clone()),
            MockBehavior::Empty => Ok(vec![]),
            MockBehavior::RateLimited => Err(ProviderError::RateLimited {
                provider: self.name.clone(),
                status: 429,
            }),
            MockBehavior::Transient => Err(ProviderError::UnexpectedStatus { status: 500 }),
        }
    }
}

/// Build `n` distinct results attributed to `source`.
pub fn sample_results(source: &str, n: usize) -> Vec<SearchResult> {
    (0..n)
        .map(|i| {
            SearchResult::new(
                format!("Result {i}"),
                format!("Snippet {i}"),
                format!("https://example.nl/{i}"),
                source,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_records_calls_and_returns_results() {
        let mock = MockProvider::returning("mock", sample_results("mock", 2));
        let results = mock.search("ai experts", &SearchOptions::default()).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(mock.calls(), vec!["ai experts".to_string()]);
    }

    #[tokio::test]
    async fn rate_limited_mock_signals_rate_limit() {
        let mock = MockProvider::rate_limited("mock");
        let err = mock
            .search("q", &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_rate_limit());
    }

    #[tokio::test]
    async fn calls_handle_survives_a_move() {
        let mock = MockProvider::empty("mock");
        let handle = mock.calls_handle();

        let moved = mock;
        moved.search("q", &SearchOptions::default()).await.unwrap();

        assert_eq!(handle.read().unwrap().len(), 1);
    }
}
