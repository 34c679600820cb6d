//! Strategy-independent candidate filtering.
//!
//! Applied to the output of every recognition strategy so both are held
//! to the same invariants: names have at least two tokens, contain no
//! digits, and are not organization names.

use std::collections::HashSet;

use crate::types::PersonCandidate;

/// Substrings that mark a "name" as an organization, not a person.
/// English keywords plus their Dutch equivalents.
pub const ORG_KEYWORDS: &[&str] = &[
    "university",
    "universiteit",
    "hospital",
    "ziekenhuis",
    "foundation",
    "stichting",
    "institute",
    "instituut",
    "college",
    "hogeschool",
    "academy",
    "academie",
    "gemeente",
    "ministerie",
];

/// Whether a name is plausibly a person: at least two space-separated
/// tokens, no digits, no organization keyword.
pub fn is_valid_person_name(name: &str) -> bool {
    if name.split_whitespace().count() < 2 {
        return false;
    }
    if name.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    let lowered = name.to_lowercase();
    !ORG_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Apply the validity rules, deduplicate case-insensitively (first
/// occurrence wins), and cap the output.
pub fn finalize(candidates: Vec<PersonCandidate>, cap: usize) -> Vec<PersonCandidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for candidate in candidates {
        if !is_valid_person_name(&candidate.name) {
            continue;
        }
        if !seen.insert(candidate.name.to_lowercase()) {
            continue;
        }
        out.push(candidate);
        if out.len() >= cap {
            break;
        }
    }

    out
}
