//! Typed errors for the guest search library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The error-containment boundary is the orchestrator: provider failures
//! other than rate limiting never escape a provider's `search()`, and the
//! orchestrator itself is infallible from the caller's perspective.

use thiserror::Error;

/// Errors that can occur inside a search provider.
///
/// Only the `RateLimited` variant ever propagates out of a provider's
/// `search()` — the orchestrator suspends that provider for the rest of
/// the session. The remaining variants exist for the internal request
/// helpers; providers convert them into an empty result set and a log line.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend reported quota exhaustion or throttling (HTTP 402/429).
    #[error("{provider} rate limited (HTTP {status})")]
    RateLimited { provider: String, status: u16 },

    /// HTTP request failed (network error, timeout, bad TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The backend answered with a status the provider does not handle.
    #[error("unexpected status: HTTP {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body did not match the expected shape.
    #[error("response decode error: {0}")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Whether this error is a rate-limit signal.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }

    pub(crate) fn http(err: reqwest::Error) -> Self {
        ProviderError::Http(Box::new(err))
    }

    pub(crate) fn decode(err: reqwest::Error) -> Self {
        ProviderError::Decode(Box::new(err))
    }
}

/// Errors reading or writing the durable cache store.
///
/// Always recovered locally: the cache degrades to in-memory-only and the
/// failure is logged, never raised past the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors refreshing the community-instance directory.
///
/// Recovered via the last-known-good cache or the hardcoded fallback list.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory fetch failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("directory API returned HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("no instances met the uptime filter")]
    NoQualifyingInstances,
}

/// Errors fetching a page for person extraction.
///
/// Page fetching sits outside the orchestrator's containment boundary, so
/// these are surfaced to the caller (the tool handler reports them as a
/// failed tool result).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("page fetch returned HTTP {status}")]
    UnexpectedStatus { status: u16 },
}

/// Errors loading or saving the previous-guests history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error raised by a name-recognition strategy whose backing model is
/// unavailable. The extractor falls back to the pattern strategy silently.
#[derive(Debug, Error)]
#[error("name recognizer unavailable: {0}")]
pub struct RecognizerUnavailable(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_is_distinguishable() {
        let err = ProviderError::RateLimited {
            provider: "serper".to_string(),
            status: 429,
        };
        assert!(err.is_rate_limit());

        let other = ProviderError::UnexpectedStatus { status: 500 };
        assert!(!other.is_rate_limit());
    }

    #[test]
    fn error_messages_name_the_provider() {
        let err = ProviderError::RateLimited {
            provider: "brave".to_string(),
            status: 402,
        };
        let msg = err.to_string();
        assert!(msg.contains("brave"));
        assert!(msg.contains("402"));
    }
}
