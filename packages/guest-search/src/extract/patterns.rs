//! Pattern-based name recognition.
//!
//! A fixed set of regular-expression templates over Dutch-language page
//! text. Three families of patterns:
//!
//! 1. Academic/professional titles immediately preceding a name
//!    ("Prof. dr. Jan de Vries").
//! 2. Role keywords adjacent to a name, in both directions
//!    ("Jan de Vries is hoogleraar", "directeur Maria de Wit").
//! 3. Reporting-verb constructions ("volgens Jan Jansen",
//!    "zegt Maria de Wit", "door Pieter Bakker,").
//!
//! Names must be two or more capitalized words, with Dutch tussenvoegsels
//! (van, de, der, ...) allowed between them.

use regex::Regex;

use crate::types::PersonCandidate;

// Two-or-more-word capitalized name with optional particles. The trailing
// \b keeps tokens glued to digits ("Jong06") from terminating a match.
const NAME: &str = r"[A-Z][a-zA-Z]+(?:\s+(?:van|de|der|den|ter|ten|te|op|'t|het))*(?:\s+[A-Z][a-zA-Z]+)+\b";

const ROLES: &str = "hoogleraar|professor|docent|onderzoeker|CEO|CTO|directeur|hoofd|lead|manager|wethouder|burgemeester";

/// Characters of context kept on each side of a match.
const CONTEXT_RADIUS: usize = 75;

struct NamePattern {
    regex: Regex,
    // The full match is a title-plus-name span worth reporting.
    captures_title: bool,
}

/// The always-available pattern recognizer.
pub struct PatternRecognizer {
    patterns: Vec<NamePattern>,
}

impl Default for PatternRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternRecognizer {
    /// Compile the pattern set.
    pub fn new() -> Self {
        let title = format!(
            r"(?:Prof\.\s*(?:dr\.\s*)?|Dr\.\s*|Drs\.\s*|Ir\.\s*|Ing\.\s*)({NAME})"
        );
        let name_then_role = format!(r"({NAME}),?\s+(?:is\s+|wordt\s+|als\s+)?(?:{ROLES})\b");
        let role_then_name = format!(r"\b(?:{ROLES})\s+({NAME})");
        let reporting_verb = format!(r"\b(?:[Vv]olgens|[Zz]egt|[Aa]ldus|[Vv]ertelt)\s+({NAME})");
        let attribution = format!(r"\b[Dd]oor\s+({NAME}),");

        let compile = |pattern: &str, captures_title: bool| NamePattern {
            regex: Regex::new(pattern).unwrap(),
            captures_title,
        };

        Self {
            patterns: vec![
                compile(&title, true),
                compile(&name_then_role, false),
                compile(&role_then_name, false),
                compile(&reporting_verb, false),
                compile(&attribution, false),
            ],
        }
    }

    /// Run every pattern over the text, yielding raw (unfiltered,
    /// undeduplicated) candidates.
    pub fn recognize_all(&self, text: &str) -> Vec<PersonCandidate> {
        let mut candidates = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                let Some(name) = caps.get(1) else { continue };
                let full = caps.get(0).unwrap();

                let context = surrounding_context(text, full.start(), full.end());
                let mut candidate = PersonCandidate::new(name.as_str(), context);
                if pattern.captures_title {
                    candidate = candidate.with_title_match(full.as_str().trim());
                }
                candidates.push(candidate);
            }
        }

        candidates
    }
}

/// Up to [`CONTEXT_RADIUS`] characters on each side of the match, with
/// whitespace runs collapsed. Slicing is clamped to char boundaries.
fn surrounding_context(text: &str, start: usize, end: usize) -> String {
    let from = floor_char_boundary(text, start.saturating_sub(CONTEXT_RADIUS));
    let to = ceil_char_boundary(text, (end + CONTEXT_RADIUS).min(text.len()));

    text[from..to]
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
