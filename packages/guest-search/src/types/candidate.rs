//! Person candidate types produced by the extraction layer.

use serde::{Deserialize, Serialize};

/// A person proposed by the extraction layer.
///
/// Candidates are per-page, best-effort suggestions; they become guest
/// records only through an explicit save by the orchestration loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCandidate {
    /// Full name as found in the text.
    pub name: String,

    /// Up to ~150 characters of text surrounding the match.
    pub context: String,

    /// The full title-plus-name span when an academic or professional
    /// title was part of the match (e.g. "Prof. dr. Jan de Vries").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_match: Option<String>,
}

impl PersonCandidate {
    /// Create a candidate without a title match.
    pub fn new(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            title_match: None,
        }
    }

    /// Attach the matched title span.
    pub fn with_title_match(mut self, title: impl Into<String>) -> Self {
        self.title_match = Some(title.into());
        self
    }
}
