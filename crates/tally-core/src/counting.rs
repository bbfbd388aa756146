//! Lexical counting primitives for the key-phrase estimator.

use serde::{Deserialize, Serialize};

/// Separator placed between retrieved documents before counting.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Concatenate retrieved document texts with [`DOCUMENT_SEPARATOR`].
#[must_use]
pub fn combine_contents<S: AsRef<str>>(contents: &[S]) -> String {
    contents
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

/// Case-insensitive, non-overlapping occurrences of `label` in `text`.
///
/// An empty label matches nothing.
#[must_use]
pub fn count_occurrences(text: &str, label: &str) -> u64 {
    if label.is_empty() {
        return 0;
    }
    let needle = label.to_lowercase();
    text.to_lowercase().matches(needle.as_str()).count() as u64
}

/// Number of phrases that contain `label`, ignoring case.
#[must_use]
pub fn count_matching_phrases<S: AsRef<str>>(phrases: &[S], label: &str) -> u64 {
    if label.is_empty() {
        return 0;
    }
    let needle = label.to_lowercase();
    phrases
        .iter()
        .filter(|phrase| phrase.as_ref().to_lowercase().contains(needle.as_str()))
        .count() as u64
}

/// Both lexical signals for one label; the estimate is their maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalCount {
    pub content_count: u64,
    pub phrase_count: u64,
}

impl LexicalCount {
    #[must_use]
    pub fn measure<S: AsRef<str>>(combined: &str, phrases: &[S], label: &str) -> Self {
        Self {
            content_count: count_occurrences(combined, label),
            phrase_count: count_matching_phrases(phrases, label),
        }
    }

    #[must_use]
    pub fn estimate(self) -> u64 {
        self.content_count.max(self.phrase_count)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Fire in the kitchen. FIRE alarm. fire drill", "fire", 3)]
    #[case("slip and fall; Slip And Fall", "slip and fall", 2)]
    #[case("aaaa", "aa", 2)]
    #[case("nothing relevant", "fire", 0)]
    #[case("anything", "", 0)]
    fn occurrences(#[case] text: &str, #[case] label: &str, #[case] expected: u64) {
        assert_eq!(count_occurrences(text, label), expected);
    }

    #[test]
    fn phrase_matches_are_substring_and_case_insensitive() {
        let phrases = ["Kitchen FIRE", "fire drill", "smoke", "bonfire"];
        assert_eq!(count_matching_phrases(&phrases, "fire"), 3);
    }

    #[test]
    fn lexical_estimate_takes_the_maximum() {
        let combined = combine_contents(&["A Fire started.", "Fire spread. FIRE out."]);
        let phrases: [&str; 2] = ["water damage", "injury"];
        let count = LexicalCount::measure(&combined, &phrases, "fire");

        assert_eq!(count.content_count, 3);
        assert_eq!(count.phrase_count, 0);
        assert_eq!(count.estimate(), 3);
    }

    #[test]
    fn phrases_can_outnumber_content_hits() {
        let count = LexicalCount {
            content_count: 1,
            phrase_count: 4,
        };
        assert_eq!(count.estimate(), 4);
    }

    #[test]
    fn combine_uses_blank_line_separator() {
        assert_eq!(combine_contents(&["a", "b", "c"]), "a\n\nb\n\nc");
        assert_eq!(combine_contents::<&str>(&[]), "");
    }
}
