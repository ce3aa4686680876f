//! Local lexicon-based sentiment cross-check.
//!
//! Pagegrade does not ship a lexicon. Callers that have one (AFINN, VADER,
//! a domain word list) plug it in through [`LexiconScorer`]; the analyzer
//! then reports its score next to the model-based sentiment rating.

use serde::{Deserialize, Serialize};

/// Raw lexicon score and its per-token normalization.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LexiconSentiment {
    /// Sum of the word valences found in the text.
    pub score: f64,
    /// `score` divided by the number of tokens (0 for empty text).
    pub comparative: f64,
}

impl LexiconSentiment {
    /// Builds the pair from a raw score and the token count it was computed over.
    pub fn from_score(score: f64, tokens: usize) -> Self {
        let comparative = if tokens == 0 { 0.0 } else { score / tokens as f64 };
        Self { score, comparative }
    }
}

/// Scores plain text against a sentiment lexicon.
pub trait LexiconScorer: Send + Sync {
    fn score(&self, text: &str) -> LexiconSentiment;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparative_is_score_per_token() {
        let sentiment = LexiconSentiment::from_score(6.0, 12);
        assert_eq!(sentiment.score, 6.0);
        assert_eq!(sentiment.comparative, 0.5);
    }

    #[test]
    fn test_zero_tokens() {
        assert_eq!(LexiconSentiment::from_score(3.0, 0).comparative, 0.0);
    }
}
