//! Best-effort person-name extraction from page text.
//!
//! Two strategies in a primary/fallback relationship: an optional injected
//! recognizer (e.g. a statistical NER model) and the always-available
//! pattern recognizer. When the primary strategy reports its model
//! unavailable, extraction falls back silently.
//!
//! Validity filtering, deduplication, and the output cap are strategy-
//! independent post-processing — both strategies are held to the same
//! invariants.

pub mod filter;
pub mod patterns;

pub use patterns::PatternRecognizer;

use tracing::debug;

use crate::error::RecognizerUnavailable;
use crate::types::PersonCandidate;

/// Cap on unique persons per extraction, bounding downstream cost.
pub const MAX_PERSONS: usize = 10;

/// A name-recognition strategy.
///
/// Implementations return raw candidates; they do not need to filter or
/// deduplicate — the extractor applies the shared post-processing.
pub trait NameRecognizer: Send + Sync {
    /// Strategy tag for logging.
    fn name(&self) -> &'static str;

    /// Recognize person candidates in `text`.
    ///
    /// Returns `Err` only when the strategy's backing model is unavailable;
    /// the extractor then falls back to patterns.
    fn recognize(&self, text: &str) -> Result<Vec<PersonCandidate>, RecognizerUnavailable>;
}

/// Person extractor over raw page text.
pub struct PersonExtractor {
    primary: Option<Box<dyn NameRecognizer>>,
    patterns: PatternRecognizer,
    max_persons: usize,
}

impl Default for PersonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonExtractor {
    /// Create a pattern-only extractor.
    pub fn new() -> Self {
        Self {
            primary: None,
            patterns: PatternRecognizer::new(),
            max_persons: MAX_PERSONS,
        }
    }

    /// Inject a primary recognition strategy, tried before the patterns.
    pub fn with_recognizer(mut self, recognizer: Box<dyn NameRecognizer>) -> Self {
        self.primary = Some(recognizer);
        self
    }

    /// Extract up to [`MAX_PERSONS`] unique person candidates.
    ///
    /// Deduplicated case-insensitively by name, first occurrence wins.
    pub fn extract(&self, text: &str) -> Vec<PersonCandidate> {
        if text.trim().is_empty() {
            return vec![];
        }

        let raw = match &self.primary {
            Some(recognizer) => match recognizer.recognize(text) {
                Ok(candidates) => candidates,
                Err(err) => {
                    debug!(
                        recognizer = recognizer.name(),
                        error = %err,
                        "primary recognizer unavailable, falling back to patterns"
                    );
                    self.patterns.recognize_all(text)
                }
            },
            None => self.patterns.recognize_all(text),
        };

        filter::finalize(raw, self.max_persons)
    }
}

impl NameRecognizer for PatternRecognizer {
    fn name(&self) -> &'static str {
        "patterns"
    }

    fn recognize(&self, text: &str) -> Result<Vec<PersonCandidate>, RecognizerUnavailable> {
        Ok(self.recognize_all(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenModel;

    impl NameRecognizer for BrokenModel {
        fn name(&self) -> &'static str {
            "broken_model"
        }

        fn recognize(&self, _text: &str) -> Result<Vec<PersonCandidate>, RecognizerUnavailable> {
            Err(RecognizerUnavailable("model file missing".to_string()))
        }
    }

    struct FixedModel(Vec<PersonCandidate>);

    impl NameRecognizer for FixedModel {
        fn name(&self) -> &'static str {
            "fixed_model"
        }

        fn recognize(&self, _text: &str) -> Result<Vec<PersonCandidate>, RecognizerUnavailable> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn titled_name_yields_one_candidate_with_title_match() {
        let extractor = PersonExtractor::new();
        let text = "Prof. dr. Jan de Vries is hoogleraar AI. \
                    Kees de Jong06 werkt bij Amsterdam University Hospital.";

        let persons = extractor.extract(text);

        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].name, "Jan de Vries");
        assert_eq!(
            persons[0].title_match.as_deref(),
            Some("Prof. dr. Jan de Vries")
        );
        assert!(persons[0].context.contains("Jan de Vries"));
    }

    #[test]
    fn broken_primary_falls_back_to_patterns_silently() {
        let extractor = PersonExtractor::new().with_recognizer(Box::new(BrokenModel));

        let persons = extractor.extract("Dr. Maria Jansen presenteert het onderzoek.");

        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].name, "Maria Jansen");
    }

    #[test]
    fn primary_results_still_pass_the_shared_filter() {
        let candidates = vec![
            PersonCandidate::new("Jan Jansen", "ctx"),
            PersonCandidate::new("Mononym", "ctx"),
            PersonCandidate::new("Kees de Jong06", "ctx"),
            PersonCandidate::new("Amsterdam University Hospital", "ctx"),
            PersonCandidate::new("jan jansen", "duplicate, different case"),
        ];
        let extractor = PersonExtractor::new().with_recognizer(Box::new(FixedModel(candidates)));

        let persons = extractor.extract("whatever");

        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].name, "Jan Jansen");
    }

    #[test]
    fn empty_text_extracts_nothing() {
        let extractor = PersonExtractor::new();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \n\t  ").is_empty());
    }

    #[test]
    fn repeated_names_are_deduplicated() {
        let extractor = PersonExtractor::new();
        let text = "Jan Jansen is directeur. Dr. Jan Jansen werkt bij TNO. \
                    Prof. Jan Jansen is hoogleraar.";

        let persons = extractor.extract(text);
        let jan_count = persons.iter().filter(|p| p.name == "Jan Jansen").count();
        assert_eq!(jan_count, 1);
    }

    #[test]
    fn output_is_capped_at_ten_unique_persons() {
        let candidates: Vec<PersonCandidate> = (0..15)
            .map(|i| PersonCandidate::new(format!("Persoon Nummer{}", char::from(b'A' + i)), "ctx"))
            .collect();
        let extractor = PersonExtractor::new().with_recognizer(Box::new(FixedModel(candidates)));

        assert_eq!(extractor.extract("whatever").len(), MAX_PERSONS);
    }
}
