//! SearXNG community-instance provider.
//!
//! Free and keyless, at the cost of variable instance quality. Each call
//! hits the current instance; any HTTP failure rotates to the next one in
//! the directory, with a bounded number of attempts per search.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::providers::instances::FALLBACK_INSTANCES;
use crate::types::{SearchOptions, SearchResult};

const MAX_ATTEMPTS: usize = 3;
const MAX_RESULTS: usize = 10;
const ENGINES: &str = "google,bing,duckduckgo";
const USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Debug, Deserialize)]
struct SearxngResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
}

/// SearXNG provider over a rotating instance list.
pub struct SearxngProvider {
    client: reqwest::Client,
    timeout: Duration,
    instances: Vec<String>,
    current: AtomicUsize,
}

impl SearxngProvider {
    pub const NAME: &'static str = "searxng";

    /// Create a provider over the given instance list. An empty list falls
    /// back to the hardcoded known-good instances.
    pub fn new(instances: Vec<String>) -> Self {
        let instances = if instances.is_empty() {
            FALLBACK_INSTANCES.iter().map(|s| s.to_string()).collect()
        } else {
            instances
        };

        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(10),
            instances,
            current: AtomicUsize::new(0),
        }
    }

    /// Pin a specific instance as the first one tried.
    pub fn with_instance(mut self, url: impl Into<String>) -> Self {
        self.instances.insert(0, url.into());
        self.current.store(0, Ordering::Relaxed);
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Always available as a free option.
    pub fn is_available(&self) -> bool {
        true
    }

    fn current_instance(&self) -> &str {
        let idx = self.current.load(Ordering::Relaxed) % self.instances.len();
        &self.instances[idx]
    }

    fn rotate(&self) {
        self.current.fetch_add(1, Ordering::Relaxed);
        info!(provider = Self::NAME, instance = %self.current_instance(), "rotated instance");
    }

    /// Search via the current instance, rotating on failure.
    ///
    /// Never signals a rate limit — a struggling instance is handled by
    /// rotation, and exhausting all attempts yields empty results.
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        for _attempt in 0..MAX_ATTEMPTS {
            let instance = self.current_instance().to_string();

            match self.request(&instance, query, options).await {
                Ok(results) => {
                    info!(
                        provider = Self::NAME,
                        instance = %instance,
                        results = results.len(),
                        "search succeeded"
                    );
                    return Ok(results);
                }
                Err(err) => {
                    warn!(provider = Self::NAME, instance = %instance, error = %err, "instance failed");
                    self.rotate();
                }
            }
        }

        Ok(vec![])
    }

    async fn request(
        &self,
        instance: &str,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let url = format!("{}/search", instance.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("language", options.language.as_str()),
                ("engines", ENGINES),
            ])
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

        let parsed: SearxngResponse = response.json().await.map_err(ProviderError::decode)?;

        Ok(parsed
            .results
            .into_iter()
            .take(MAX_RESULTS)
            .map(|r| SearchResult::new(r.title, r.content, r.url, Self::NAME))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_instance_list_falls_back_to_hardcoded() {
        let provider = SearxngProvider::new(vec![]);
        assert_eq!(provider.instances.len(), FALLBACK_INSTANCES.len());
        assert!(provider.is_available());
    }

    #[test]
    fn rotation_cycles_through_instances() {
        let provider = SearxngProvider::new(vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
        ]);

        assert_eq!(provider.current_instance(), "https://a.example");
        provider.rotate();
        assert_eq!(provider.current_instance(), "https://b.example");
        provider.rotate();
        assert_eq!(provider.current_instance(), "https://a.example");
    }

    #[test]
    fn pinned_instance_is_tried_first() {
        let provider = SearxngProvider::new(vec!["https://a.example".to_string()])
            .with_instance("https://pinned.example");
        assert_eq!(provider.current_instance(), "https://pinned.example");
    }

    #[test]
    fn results_are_capped_at_ten() {
        let results: Vec<SearxngResult> = (0..15)
            .map(|i| SearxngResult {
                title: format!("r{i}"),
                content: String::new(),
                url: format!("https://example.nl/{i}"),
            })
            .collect();
        let parsed = SearxngResponse { results };

        let capped: Vec<SearchResult> = parsed
            .results
            .into_iter()
            .take(MAX_RESULTS)
            .map(|r| SearchResult::new(r.title, r.content, r.url, SearxngProvider::NAME))
            .collect();
        assert_eq!(capped.len(), 10);
    }
}
