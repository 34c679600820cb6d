//! Durable search-result cache with a 24-hour TTL.
//!
//! Results are keyed by a hash of the normalized query plus the option
//! values that change what a provider would return (result count, language).
//! The orchestrator caches under the provider-agnostic `"any"` tag: a cache
//! hit from one session satisfies a request that would otherwise have tried
//! a different provider order.
//!
//! Cache I/O failures never propagate — a missing or corrupt file means the
//! cache starts empty, and a failed write leaves the in-memory state valid.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::types::{SearchOptions, SearchResult};

/// Provider tag the orchestrator caches under.
pub const CACHE_PROVIDER_TAG: &str = "any";

const TTL_HOURS: i64 = 24;

/// One cached search, as persisted on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the entry was written.
    pub timestamp: DateTime<Utc>,

    /// The query as issued (pre-normalization, for inspection).
    pub query: String,

    /// Provider tag the entry was cached under.
    pub provider: String,

    /// The cached results.
    pub results: Vec<SearchResult>,

    /// Result count, denormalized for quick stats.
    pub result_count: usize,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp >= Duration::hours(TTL_HOURS)
    }
}

/// Statistics over the live (non-expired) cache contents.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub cache_file_size: u64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Search-result cache backed by a JSON file.
///
/// The file is a JSON object mapping key hashes to [`CacheEntry`] values;
/// the format is stable for compatibility with existing cache files.
pub struct ResultCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    /// Open a cache at `path`, loading any persisted entries.
    ///
    /// A missing, unreadable, or unparsable file is non-fatal: the cache
    /// starts empty and the problem is logged.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::load(&path) {
            Ok(entries) => {
                if !entries.is_empty() {
                    info!(path = %path.display(), entries = entries.len(), "loaded search cache");
                }
                entries
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load search cache, starting empty");
                HashMap::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn load(path: &Path) -> Result<HashMap<String, CacheEntry>, crate::error::CacheError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Deterministic key over the normalized query, provider tag, and the
    /// option values that affect provider output.
    fn key(query: &str, provider_tag: &str, options: &SearchOptions) -> String {
        let normalized = format!(
            "{}|{}|{}|{}",
            query.trim().to_lowercase(),
            provider_tag,
            options.num_results,
            options.language,
        );
        hex::encode(Sha256::digest(normalized.as_bytes()))
    }

    /// Return cached results if present and younger than the TTL.
    ///
    /// An expired entry is evicted as a side effect and treated as absent.
    pub fn get(
        &self,
        query: &str,
        provider_tag: &str,
        options: &SearchOptions,
    ) -> Option<Vec<SearchResult>> {
        let key = Self::key(query, provider_tag, options);
        let now = Utc::now();

        {
            let entries = self.entries.read().unwrap();
            match entries.get(&key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => {
                    info!(
                        query = %query,
                        provider = %provider_tag,
                        results = entry.results.len(),
                        "cache hit"
                    );
                    return Some(entry.results.clone());
                }
                Some(_) => {}
            }
        }

        // Stale entry: evict lazily and report a miss.
        let mut entries = self.entries.write().unwrap();
        if entries.remove(&key).is_some() {
            debug!(query = %query, "evicted expired cache entry");
            self.persist(&entries);
        }
        None
    }

    /// Cache results for a query. Empty result sets are never cached — an
    /// empty answer from a flaky provider must not mask a later good one
    /// for the whole TTL.
    pub fn put(
        &self,
        query: &str,
        provider_tag: &str,
        results: &[SearchResult],
        options: &SearchOptions,
    ) {
        if results.is_empty() {
            return;
        }

        let key = Self::key(query, provider_tag, options);
        let entry = CacheEntry {
            timestamp: Utc::now(),
            query: query.to_string(),
            provider: provider_tag.to_string(),
            results: results.to_vec(),
            result_count: results.len(),
        };

        let mut entries = self.entries.write().unwrap();
        entries.insert(key, entry);
        self.persist(&entries);
        info!(query = %query, results = results.len(), "cached search results");
    }

    /// Sweep all entries, removing any older than the TTL.
    ///
    /// Returns the number of removed entries. Safe to call at any time.
    pub fn evict_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            info!(removed, "removed expired cache entries");
            self.persist(&entries);
        }
        removed
    }

    /// Statistics over the live cache contents (expired entries are swept
    /// first).
    pub fn stats(&self) -> CacheStats {
        self.evict_expired();

        let entries = self.entries.read().unwrap();
        let timestamps: Vec<DateTime<Utc>> = entries.values().map(|e| e.timestamp).collect();

        CacheStats {
            total_entries: entries.len(),
            cache_file_size: fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0),
            oldest_entry: timestamps.iter().min().copied(),
            newest_entry: timestamps.iter().max().copied(),
        }
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the current state to disk. A failed write is logged and the
    /// in-memory state stays valid.
    fn persist(&self, entries: &HashMap<String, CacheEntry>) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                error!(path = %self.path.display(), error = %err, "failed to create cache directory");
                return;
            }
        }

        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    error!(path = %self.path.display(), error = %err, "failed to save search cache");
                }
            }
            Err(err) => {
                error!(error = %err, "failed to serialize search cache");
            }
        }
    }
}
