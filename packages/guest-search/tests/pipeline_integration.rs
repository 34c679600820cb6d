//! Integration tests for the search pipeline.
//!
//! These tests verify the full orchestrator workflow against scripted
//! providers:
//! 1. Search with fallback across providers
//! 2. Cache the winning answer under the provider-agnostic key
//! 3. Suspend rate-limited providers for the session
//! 4. Extract persons from fetched page text

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use guest_search::{
    testing::{sample_results, MockProvider},
    PageFetcher, Provider, SearchConfig, SearchOptions, SmartSearch,
};

static COUNTER: AtomicU32 = AtomicU32::new(0);

fn temp_cache_path() -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "guest-search-integration-{}-{}.json",
        std::process::id(),
        n
    ))
}

#[tokio::test]
async fn search_caches_and_serves_repeat_queries_without_providers() {
    let cache_path = temp_cache_path();

    // First run: provider answers and the result is cached.
    {
        let provider = MockProvider::returning("provider_a", sample_results("provider_a", 3));
        let search = SmartSearch::with_providers(
            vec![Provider::Mock(provider)],
            SearchConfig::new().with_cache_path(&cache_path),
        );

        let response = search
            .search("AI Netherlands 2024", &SearchOptions::default())
            .await;
        assert_eq!(response.provider.as_deref(), Some("provider_a"));
        assert_eq!(response.results.len(), 3);
        assert!(!response.cache_hit);
    }

    // Second run in a fresh session: cache answers, provider never called.
    {
        let provider = MockProvider::rate_limited("would_explode");
        let calls = provider.calls_handle();
        let search = SmartSearch::with_providers(
            vec![Provider::Mock(provider)],
            SearchConfig::new().with_cache_path(&cache_path),
        );

        let response = search
            .search("AI Netherlands 2024", &SearchOptions::default())
            .await;
        assert!(response.cache_hit);
        assert_eq!(response.provider.as_deref(), Some("cached"));
        assert_eq!(response.results.len(), 3);
        assert!(calls.read().unwrap().is_empty());
    }
}

#[tokio::test]
async fn rate_limited_provider_stays_suspended_across_searches() {
    let limited = MockProvider::rate_limited("provider_a");
    let limited_calls = limited.calls_handle();
    let backup = MockProvider::returning("provider_b", sample_results("provider_b", 2));

    let search = SmartSearch::with_providers(
        vec![Provider::Mock(limited), Provider::Mock(backup)],
        SearchConfig::new().with_cache_enabled(false),
    );

    for i in 0..3 {
        let response = search
            .search(&format!("query {i}"), &SearchOptions::default())
            .await;
        assert_eq!(response.provider.as_deref(), Some("provider_b"));
    }

    // Only the first search ever touched the rate-limited provider.
    assert_eq!(limited_calls.read().unwrap().len(), 1);

    let status = search.status();
    assert_eq!(status.providers, vec!["provider_a".to_string(), "provider_b".to_string()]);
    assert_eq!(status.rate_limited_providers, vec!["provider_a".to_string()]);
}

#[tokio::test]
async fn exhausted_pipeline_returns_the_empty_response_shape() {
    let search = SmartSearch::with_providers(
        vec![
            Provider::Mock(MockProvider::empty("a")),
            Provider::Mock(MockProvider::empty("b")),
        ],
        SearchConfig::new().with_cache_enabled(false),
    );

    let response = search.search("obscure query", &SearchOptions::default()).await;
    assert!(response.provider.is_none());
    assert!(response.results.is_empty());
    assert!(!response.cache_hit);

    // Serialized shape matches the tool-result contract.
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["provider"], serde_json::Value::Null);
    assert_eq!(json["results"].as_array().unwrap().len(), 0);
    assert_eq!(json["cache_hit"], false);
}

#[test]
fn fetched_page_payload_reports_potential_persons() {
    let html = r#"
        <html>
          <head><title>Congres AI &amp; Zorg</title></head>
          <body>
            <p>Keynote door Prof. dr. Sanne de Boer, hoogleraar medische AI.</p>
            <p>Volgens Tom Hendriks gaat de zorg sterk veranderen.</p>
            <p>Locatie: Amsterdam University Hospital.</p>
          </body>
        </html>
    "#;

    let fetcher = PageFetcher::new();
    let page = fetcher.page_from_html("https://congres.example/programma", html);

    let names: Vec<&str> = page
        .potential_persons
        .iter()
        .map(|p| p.name.as_str())
        .collect();

    assert!(names.contains(&"Sanne de Boer"));
    assert!(names.contains(&"Tom Hendriks"));
    assert!(!names.iter().any(|n| n.contains("University")));
    assert_eq!(page.persons_found, page.potential_persons.len());

    let json = serde_json::to_value(&page).unwrap();
    assert!(json["potential_persons"].is_array());
    assert_eq!(json["persons_found"], page.persons_found);
}
