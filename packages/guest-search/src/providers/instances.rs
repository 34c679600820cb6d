//! Community-instance directory for the SearXNG provider.
//!
//! Discovers usable public instances from the searx.space directory,
//! filters them by reported daily uptime, and caches the result for 24
//! hours. A hardcoded list of known-good instances guarantees the
//! directory never comes up empty.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::DirectoryError;

/// Live directory of public instances with uptime data.
pub const INSTANCES_API_URL: &str = "https://searx.space/data/instances.json";

/// Known-good instances used when discovery and the cache both fail.
pub const FALLBACK_INSTANCES: [&str; 5] = [
    "https://searx.be",
    "https://searx.work",
    "https://search.bus-hit.me",
    "https://search.sapti.me",
    "https://searx.tiekoetter.com",
];

const CACHE_TTL_HOURS: i64 = 24;
const RELAXED_UPTIME_TOP_N: usize = 10;

#[derive(Debug, Serialize, Deserialize)]
struct DirectoryCache {
    instances: Vec<String>,
    cached_at: DateTime<Utc>,
    count: usize,
}

/// Ranked list of usable community endpoints.
pub struct InstanceDirectory {
    cache_path: PathBuf,
    instances: Vec<String>,
}

impl InstanceDirectory {
    /// Load the directory: cache if younger than 24 h, else a live fetch,
    /// else the hardcoded fallback list. Never yields an empty list.
    pub async fn load(cache_path: impl Into<PathBuf>, client: &reqwest::Client) -> Self {
        let cache_path = cache_path.into();

        if let Some(instances) = Self::load_cache(&cache_path) {
            info!(count = instances.len(), "loaded instance directory from cache");
            return Self {
                cache_path,
                instances,
            };
        }

        let mut directory = Self {
            cache_path,
            instances: vec![],
        };
        directory.refresh(client).await;
        directory
    }

    /// Force a live fetch, replacing the current list on success. On
    /// failure, keeps the current list, or the hardcoded fallback if the
    /// directory holds nothing yet.
    pub async fn refresh(&mut self, client: &reqwest::Client) {
        match Self::fetch(client).await {
            Ok(instances) => {
                info!(count = instances.len(), "fetched instance directory");
                self.instances = instances;
                self.persist();
            }
            Err(err) => {
                warn!(error = %err, "instance directory fetch failed");
                if self.instances.is_empty() {
                    self.instances = FALLBACK_INSTANCES.iter().map(|s| s.to_string()).collect();
                    info!(count = self.instances.len(), "using hardcoded fallback instances");
                }
            }
        }
    }

    /// The discovered endpoints, best candidates first.
    pub fn instances(&self) -> &[String] {
        &self.instances
    }

    fn load_cache(path: &Path) -> Option<Vec<String>> {
        let raw = fs::read_to_string(path).ok()?;
        let cache: DirectoryCache = match serde_json::from_str(&raw) {
            Ok(cache) => cache,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable instance cache");
                return None;
            }
        };

        let age = Utc::now() - cache.cached_at;
        if age >= chrono::Duration::hours(CACHE_TTL_HOURS) || cache.instances.is_empty() {
            return None;
        }
        Some(cache.instances)
    }

    async fn fetch(client: &reqwest::Client) -> Result<Vec<String>, DirectoryError> {
        let response = client
            .get(INSTANCES_API_URL)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| DirectoryError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DirectoryError::Http(Box::new(e)))?;

        let instances = select_instances(&payload);
        if instances.is_empty() {
            return Err(DirectoryError::NoQualifyingInstances);
        }
        Ok(instances)
    }

    fn persist(&self) {
        if let Some(parent) = self.cache_path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                error!(path = %self.cache_path.display(), error = %err, "failed to create cache directory");
                return;
            }
        }

        let cache = DirectoryCache {
            instances: self.instances.clone(),
            cached_at: Utc::now(),
            count: self.instances.len(),
        };

        match serde_json::to_string_pretty(&cache) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.cache_path, json) {
                    error!(path = %self.cache_path.display(), error = %err, "failed to save instance cache");
                }
            }
            Err(err) => error!(error = %err, "failed to serialize instance cache"),
        }
    }
}

/// Filter the searx.space payload to usable endpoints.
///
/// Primary filter: instances reporting 100% daily uptime. If none qualify,
/// relax to the top 10 with at least 99%, best first. Entries without
/// uptime data or with a non-HTTP URL are skipped.
fn select_instances(payload: &serde_json::Value) -> Vec<String> {
    let Some(entries) = payload.get("instances").and_then(|v| v.as_object()) else {
        return vec![];
    };

    let mut perfect: Vec<String> = Vec::new();
    let mut high: Vec<(String, f64)> = Vec::new();

    for (url, data) in entries {
        if !url.starts_with("http") {
            continue;
        }
        let Some(uptime_day) = data
            .get("uptime")
            .and_then(|u| u.get("uptimeDay"))
            .and_then(|v| v.as_f64())
        else {
            continue;
        };

        if uptime_day >= 99.0 {
            high.push((url.clone(), uptime_day));
        }
        if uptime_day == 100.0 {
            perfect.push(url.clone());
        }
    }

    if !perfect.is_empty() {
        return perfect;
    }

    high.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    high.into_iter()
        .take(RELAXED_UPTIME_TOP_N)
        .map(|(url, _)| url)
        .collect()
}
