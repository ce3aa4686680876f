//! Parsing of free-form model output.
//!
//! The provider returns unstructured text. Everything that imposes structure
//! on it lives here: the digit search for numeric passes and the marker
//! tokens that split a critique into remarks and suggestions. Ambiguous
//! output never errors; it degrades to `None` or an empty string.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Markers that introduce the actionable part of a critique, in priority order.
pub const SUGGESTION_MARKERS: &[&str] = &["Verbesserungsvorschläge:", "Vorschläge:"];

/// Lowest accepted rating.
pub const MIN_SCORE: u8 = 1;
/// Highest accepted rating.
pub const MAX_SCORE: u8 = 10;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Extracts a 1–10 rating from model output.
///
/// The first run of ASCII digits wins, so `"Bewertung: 9/10"` yields 9.
/// Text without digits, or a number outside the scale, yields `None`.
///
/// ```rust
/// use pagegrade_core::parse_score;
///
/// assert_eq!(parse_score("7"), Some(7));
/// assert_eq!(parse_score("Bewertung: 9/10"), Some(9));
/// assert_eq!(parse_score("no numbers here"), None);
/// ```
pub fn parse_score(text: &str) -> Option<u8> {
    let Some(found) = DIGITS.find(text) else {
        warn!(response = text, "no rating found in model output");
        return None;
    };

    match found.as_str().parse::<u8>() {
        Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => Some(score),
        _ => {
            warn!(response = text, value = found.as_str(), "rating outside 1-10 scale");
            None
        }
    }
}

/// Returns the critique from the first suggestion marker onwards.
///
/// The earliest occurrence of any marker wins. Returns an empty string when
/// the critique contains no marker.
pub fn extract_suggestions(critique: &str) -> String {
    let start = SUGGESTION_MARKERS
        .iter()
        .filter_map(|marker| critique.find(marker))
        .min();

    match start {
        Some(idx) => critique[idx..].trim().to_string(),
        None => {
            if !critique.trim().is_empty() {
                warn!("critique has no suggestion marker");
            }
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7", Some(7))]
    #[case("10", Some(10))]
    #[case("Bewertung: 9/10", Some(9))]
    #[case("Ich würde den Text mit 6 von 10 bewerten.", Some(6))]
    #[case("  8\n", Some(8))]
    #[case("no numbers here", None)]
    #[case("", None)]
    #[case("0", None)]
    #[case("11", None)]
    #[case("99999999999999999999", None)]
    #[case("Note ٣, final answer: 7", Some(7))]
    #[case("٧", None)]
    fn test_parse_score(#[case] input: &str, #[case] expected: Option<u8>) {
        assert_eq!(parse_score(input), expected);
    }

    #[test]
    fn test_suggestions_with_marker() {
        let critique = "Der Text ist gut lesbar. Verbesserungsvorschläge: Do X. Do Y.";
        assert_eq!(extract_suggestions(critique), "Verbesserungsvorschläge: Do X. Do Y.");
    }

    #[test]
    fn test_suggestions_short_marker() {
        let critique = "Insgesamt solide.\n\nVorschläge: Mehr Zwischenüberschriften.";
        assert_eq!(extract_suggestions(critique), "Vorschläge: Mehr Zwischenüberschriften.");
    }

    #[test]
    fn test_suggestions_earliest_marker_wins() {
        let critique = "Vorschläge: A. Später: Verbesserungsvorschläge: B.";
        assert_eq!(extract_suggestions(critique), critique);
    }

    #[test]
    fn test_suggestions_without_marker() {
        assert_eq!(extract_suggestions("Keine konkreten Hinweise."), "");
        assert_eq!(extract_suggestions(""), "");
    }
}
