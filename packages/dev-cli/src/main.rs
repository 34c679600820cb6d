//! One-off query runner for the guest search pipeline.
//!
//! Reads provider credentials from the environment, runs a single search
//! with the full fallback chain, and prints the provider status plus the
//! top results.

use anyhow::Result;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use guest_search::{SearchConfig, SearchOptions, SmartSearch};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");

    let search = SmartSearch::new(SearchConfig::from_env()).await;

    let status = search.status();
    println!("{}", "Configured providers:".bold());
    for provider in &status.providers {
        println!("  - {provider}");
    }
    if let Some(cache) = &status.cache {
        println!(
            "{} {} entries, {} bytes on disk",
            "Cache:".bold(),
            cache.total_entries,
            cache.cache_file_size
        );
    }

    if query.is_empty() {
        println!("\nUsage: guest-search-cli <query>");
        return Ok(());
    }

    println!("\n{} {}", "Searching:".bold(), query);
    let response = search.search(&query, &SearchOptions::default()).await;

    match response.provider.as_deref() {
        Some(provider) => {
            let cache_note = if response.cache_hit { " (cached)" } else { "" };
            println!(
                "{} {} resultaten via {}{}\n",
                "✓".green(),
                response.results.len(),
                provider,
                cache_note
            );
        }
        None => println!("{} geen resultaten gevonden\n", "⚠".yellow()),
    }

    print!("{}", SmartSearch::render_results(&response));
    Ok(())
}
