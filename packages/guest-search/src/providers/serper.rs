//! Serper.dev search provider — the primary paid backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::security::SecretString;
use crate::types::{SearchOptions, SearchResult};

const SERPER_URL: &str = "https://google.serper.dev/search";

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

/// Serper provider. Best result quality with rich snippets; free tier up
/// to 2,500 searches per month.
pub struct SerperProvider {
    client: reqwest::Client,
    api_key: SecretString,
    timeout: Duration,
}

impl SerperProvider {
    pub const NAME: &'static str = "serper";

    /// Create a new Serper provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: SecretString::new(api_key),
            timeout: Duration::from_secs(10),
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

    /// Search via the Serper API.
    ///
    /// Rate limiting (HTTP 402/429) propagates; any other failure returns
    /// an empty result set.
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>, ProviderError> {
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
        let body = SerperRequest {
            q: query,
            num: options.num_results,
        };

        let response = self
            .client
            .post(SERPER_URL)
            .header("X-API-KEY", self.api_key.expose())
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&body)
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

        let parsed: SerperResponse = response.json().await.map_err(ProviderError::decode)?;

        Ok(parsed
            .organic
            .into_iter()
            .map(|r| SearchResult::new(r.title, r.snippet, r.link, Self::NAME))
            .collect())
    }
}
