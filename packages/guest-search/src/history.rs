//! Previously-recommended guest history.
//!
//! Accepted candidates are recorded here so later runs can skip people
//! recommended within the exclusion window (8 weeks by default). Names are
//! matched case-insensitively.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::HistoryError;

/// Default location of the history file.
pub const DEFAULT_HISTORY_PATH: &str = "data/previous_guests.json";

const DEFAULT_EXCLUDE_WEEKS: i64 = 8;

/// One previously recommended guest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviousGuest {
    pub name: String,
    pub date: DateTime<Utc>,
    pub organization: String,
}

/// A match against the exclusion window.
#[derive(Debug, Clone, Serialize)]
pub struct RecentRecommendation {
    pub date: DateTime<Utc>,
    pub weeks_ago: i64,
}

/// History of recommended guests, backed by a JSON file.
pub struct GuestHistory {
    path: PathBuf,
    guests: Vec<PreviousGuest>,
    exclude_weeks: i64,
}

impl GuestHistory {
    /// Load history from `path`. A missing or unreadable file is
    /// non-fatal: the history starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let guests = match Self::read(&path) {
            Ok(guests) => guests,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "unreadable guest history, starting empty");
                vec![]
            }
        };

        Self {
            path,
            guests,
            exclude_weeks: DEFAULT_EXCLUDE_WEEKS,
        }
    }

    fn read(path: &Path) -> Result<Vec<PreviousGuest>, HistoryError> {
        if !path.exists() {
            return Ok(vec![]);
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Change the exclusion window.
    pub fn with_exclude_weeks(mut self, weeks: i64) -> Self {
        self.exclude_weeks = weeks;
        self
    }

    /// Whether `name` was recommended within the exclusion window.
    pub fn recently_recommended(&self, name: &str) -> Option<RecentRecommendation> {
        let now = Utc::now();
        let cutoff = now - Duration::weeks(self.exclude_weeks);

        self.guests
            .iter()
            .filter(|guest| guest.name.eq_ignore_ascii_case(name))
            .filter(|guest| guest.date >= cutoff)
            .map(|guest| RecentRecommendation {
                date: guest.date,
                weeks_ago: (now - guest.date).num_weeks(),
            })
            .next()
    }

    /// Record an accepted candidate and persist the history.
    pub fn record(&mut self, name: impl Into<String>, organization: impl Into<String>) {
        let name = name.into();
        info!(name = %name, "recording recommended guest");
        self.guests.push(PreviousGuest {
            name,
            date: Utc::now(),
            organization: organization.into(),
        });
        self.save();
    }

    /// Number of recorded guests, inside or outside the window.
    pub fn len(&self) -> usize {
        self.guests.len()
    }

    /// Whether the history holds no guests.
    pub fn is_empty(&self) -> bool {
        self.guests.is_empty()
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                error!(path = %self.path.display(), error = %err, "failed to create history directory");
                return;
            }
        }

        match serde_json::to_string_pretty(&self.guests) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    error!(path = %self.path.display(), error = %err, "failed to save guest history");
                }
            }
            Err(err) => error!(error = %err, "failed to serialize guest history"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_history_path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "guest-search-history-test-{}-{}.json",
            std::process::id(),
            n
        ))
    }

    #[test]
    fn missing_file_starts_empty() {
        let history = GuestHistory::load(temp_history_path());
        assert!(history.is_empty());
        assert!(history.recently_recommended("Jan Jansen").is_none());
    }

    #[test]
    fn recorded_guests_match_within_the_window() {
        let mut history = GuestHistory::load(temp_history_path());
        history.record("Jan Jansen", "TNO");

        let hit = history.recently_recommended("jan jansen").unwrap();
        assert_eq!(hit.weeks_ago, 0);
        assert!(history.recently_recommended("Maria de Wit").is_none());
    }

    #[test]
    fn old_recommendations_fall_outside_the_window() {
        let mut history = GuestHistory::load(temp_history_path());
        history.guests.push(PreviousGuest {
            name: "Jan Jansen".to_string(),
            date: Utc::now() - Duration::weeks(9),
            organization: "TNO".to_string(),
        });

        assert!(history.recently_recommended("Jan Jansen").is_none());

        let shortened = GuestHistory::load(temp_history_path()).with_exclude_weeks(1);
        assert!(shortened.recently_recommended("Jan Jansen").is_none());
    }

    #[test]
    fn history_round_trips_through_the_file() {
        let path = temp_history_path();

        {
            let mut history = GuestHistory::load(&path);
            history.record("Maria de Wit", "Universiteit Utrecht");
        }

        let reloaded = GuestHistory::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.recently_recommended("Maria de Wit").is_some());
    }

    #[test]
    fn corrupt_history_file_starts_empty() {
        let path = temp_history_path();
        fs::write(&path, "[{ bad json").unwrap();

        let history = GuestHistory::load(&path);
        assert!(history.is_empty());
    }
}
