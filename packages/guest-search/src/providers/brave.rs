//! Brave Search provider — the secondary paid backend.
//!
//! Brave's free tier allows 1 request per second. The provider paces itself
//! with the governor crate before every request; pacing is a self-imposed
//! policy and is never reported as a rate-limit signal.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{Quota, RateLimiter};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::security::SecretString;
use crate::types::{SearchOptions, SearchResult};

const BRAVE_URL: &str = "https://api.search.brave.com/res/v1/web/search";

type DefaultRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

#[derive(Debug, Deserialize)]
struct BraveResponse {
    web: Option<BraveWeb>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
}

/// Brave Search provider. Good quality with snippets; free tier available.
pub struct BraveProvider {
    client: reqwest::Client,
    api_key: SecretString,
    timeout: Duration,
    pacer: Arc<DefaultRateLimiter>,
}

impl BraveProvider {
    pub const NAME: &'static str = "brave";

    /// Create a new Brave provider with 1 req/s pacing.
    pub fn new(api_key: impl Into<String>) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(1).expect("quota must be > 0"));
        Self {
            client: reqwest::Client::new(),
            api_key: SecretString::new(api_key),
            timeout: Duration::from_secs(10),
            pacer: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Available iff an API key is configured.
    pub fn is_available(&self) -> bool {
        self.api_key.is_configured()
    }

    /// Search via the Brave API, sleeping out the pacing interval first.
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        debug!(provider = Self::NAME, "waiting for pacing permit");
        self.pacer.until_ready().await;

        match self.request(query, options).await {
            Ok(results) => {
                info!(provider = Self::NAME, results = results.len(), "search succeeded");
                Ok(results)
            }
            Err(err) if err.is_rate_limit() => Err(err),
            Err(err) => {
                warn!(provider = Self::NAME, error = %err, "search failed");
                Ok(vec![])
            }
        }
    }

    async fn request(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
        let count = options.num_results.to_string();
        let response = self
            .client
            .get(BRAVE_URL)
            .header("X-Subscription-Token", self.api_key.expose())
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", count.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ProviderError::http)?;

        let status = response.status();
        if status == reqwest::StatusCode::PAYMENT_REQUIRED
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            return Err(ProviderError::RateLimited {
                provider: Self::NAME.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let parsed: BraveResponse = response.json().await.map_err(ProviderError::decode)?;

        Ok(parsed
            .web
            .map(|w| w.results)
            .unwrap_or_default()
            .into_iter()
            .map(|r| SearchResult::new(r.title, r.description, r.url, Self::NAME))
            .collect())
    }
}
