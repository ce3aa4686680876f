//! Multi-pass analysis of a text sample.
//!
//! [`Analyzer`] issues the critique, readability, SEO and (optionally)
//! sentiment passes concurrently, each under its own timeout, and folds the
//! answers into one [`AnalysisResult`].
//!
//! Failure policy: a pass that errors or times out leaves its facet empty and
//! is listed in [`AnalysisResult::failed_passes`]. The analysis as a whole
//! only fails when every issued pass failed, with the first pass error.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::extract::{ExtractedContent, count_words, truncate_chars};
use crate::provider::{GenerationRequest, Pass, TextGenerator};
use crate::response::{extract_suggestions, parse_score};
use crate::sentiment::{LexiconScorer, LexiconSentiment};
use crate::{PagegradeError, Result, prompts};

/// Combined outcome of all passes for one text sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Verbatim critique text.
    pub qualitative_analysis: String,
    /// Critique from the suggestion marker onwards, or empty.
    pub suggestions: String,
    pub readability_score: Option<u8>,
    pub seo_score: Option<u8>,
    pub sentiment_score: Option<u8>,
    /// Raw answer of the sentiment pass.
    pub sentiment_analysis: String,
    /// Local lexicon cross-check, when a scorer is attached.
    pub lexicon_sentiment: Option<LexiconSentiment>,
    /// Whitespace tokens in `text_sample`.
    pub word_count: usize,
    pub title: String,
    pub preview_image_url: Option<String>,
    /// The exact sample embedded in the prompts.
    pub text_sample: String,
    /// Passes that errored or timed out.
    pub failed_passes: Vec<Pass>,
}

impl AnalysisResult {
    /// Result with every facet empty, used for blank input.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether at least one pass failed.
    pub fn is_partial(&self) -> bool {
        !self.failed_passes.is_empty()
    }
}

/// Orchestrates the analysis passes against a [`TextGenerator`].
#[derive(Clone)]
pub struct Analyzer {
    generator: Arc<dyn TextGenerator>,
    config: AnalysisConfig,
    lexicon: Option<Arc<dyn LexiconScorer>>,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, config: AnalysisConfig) -> Self {
        Self { generator, config, lexicon: None }
    }

    /// Attaches a local lexicon scorer run alongside the model passes.
    pub fn with_lexicon(mut self, lexicon: Arc<dyn LexiconScorer>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes extracted page content, passing title and preview image through.
    pub async fn analyze_content(&self, content: &ExtractedContent, keyphrase: &str) -> Result<AnalysisResult> {
        let mut result = self.analyze(&content.body_text, keyphrase).await?;
        result.title = content.title.clone();
        result.preview_image_url = content.preview_image_url.clone();
        Ok(result)
    }

    /// Runs all passes over `text_sample`.
    ///
    /// Blank input short-circuits to [`AnalysisResult::empty`] without calling
    /// the generator.
    pub async fn analyze(&self, text_sample: &str, keyphrase: &str) -> Result<AnalysisResult> {
        let sample = truncate_chars(text_sample.trim(), self.config.max_chars).trim_end();
        if sample.is_empty() {
            debug!("empty text sample, skipping analysis passes");
            return Ok(AnalysisResult::empty());
        }

        let started = Instant::now();
        let lexicon_sentiment = self.lexicon.as_ref().map(|lexicon| lexicon.score(sample));

        let sentiment_pass = async {
            if self.config.include_sentiment {
                Some(self.run(Pass::Sentiment, prompts::sentiment(sample), self.config.sentiment_temperature).await)
            } else {
                None
            }
        };

        let (critique, readability, seo, sentiment) = tokio::join!(
            self.run(Pass::Critique, prompts::critique(sample, keyphrase), self.config.critique_temperature),
            self.run(Pass::Readability, prompts::readability(sample), self.config.score_temperature),
            self.run(Pass::Seo, prompts::seo(sample, keyphrase), self.config.score_temperature),
            sentiment_pass,
        );

        let issued = if sentiment.is_some() { 4 } else { 3 };
        let mut failures = Vec::new();

        let critique = settle(Pass::Critique, critique, &mut failures);
        let readability = settle(Pass::Readability, readability, &mut failures);
        let seo = settle(Pass::Seo, seo, &mut failures);
        let sentiment = sentiment.and_then(|outcome| settle(Pass::Sentiment, outcome, &mut failures));

        if failures.len() == issued {
            warn!("every analysis pass failed");
            let (_, first) = failures.swap_remove(0);
            return Err(first);
        }

        let qualitative_analysis = critique.unwrap_or_default();
        let suggestions = extract_suggestions(&qualitative_analysis);

        let result = AnalysisResult {
            suggestions,
            readability_score: readability.as_deref().and_then(parse_score),
            seo_score: seo.as_deref().and_then(parse_score),
            sentiment_score: sentiment.as_deref().and_then(parse_score),
            sentiment_analysis: sentiment.unwrap_or_default(),
            qualitative_analysis,
            lexicon_sentiment,
            word_count: count_words(sample),
            title: String::new(),
            preview_image_url: None,
            text_sample: sample.to_string(),
            failed_passes: failures.iter().map(|(pass, _)| *pass).collect(),
        };

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            failed = result.failed_passes.len(),
            "analysis finished"
        );

        Ok(result)
    }

    async fn run(&self, pass: Pass, prompt: String, temperature: f32) -> Result<String> {
        let request = GenerationRequest {
            pass,
            model: self.config.model.clone(),
            temperature,
            system: self.config.system_instruction.clone(),
            prompt,
        };

        let started = Instant::now();
        debug!(%pass, "pass started");

        match tokio::time::timeout(self.config.pass_timeout, self.generator.generate(&request)).await {
            Ok(outcome) => {
                debug!(%pass, elapsed_ms = started.elapsed().as_millis() as u64, ok = outcome.is_ok(), "pass finished");
                outcome
            }
            Err(_) => Err(PagegradeError::PassTimeout { pass, timeout_ms: self.config.pass_timeout.as_millis() as u64 }),
        }
    }
}

fn settle(pass: Pass, outcome: Result<String>, failures: &mut Vec<(Pass, PagegradeError)>) -> Option<String> {
    match outcome {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(%pass, error = %e, "analysis pass failed");
            failures.push((pass, e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone)]
    enum Behavior {
        Reply(&'static str),
        Fail(u16),
        Hang,
    }

    struct FakeGenerator {
        behaviors: HashMap<Pass, (Behavior, Duration)>,
        calls: AtomicUsize,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl FakeGenerator {
        fn new() -> Self {
            let mut behaviors = HashMap::new();
            behaviors.insert(
                Pass::Critique,
                (Behavior::Reply("Gut lesbar. Verbesserungsvorschläge: Mehr Absätze."), Duration::ZERO),
            );
            behaviors.insert(Pass::Readability, (Behavior::Reply("7"), Duration::ZERO));
            behaviors.insert(Pass::Seo, (Behavior::Reply("Bewertung: 9/10"), Duration::ZERO));
            behaviors.insert(Pass::Sentiment, (Behavior::Reply("6"), Duration::ZERO));
            Self { behaviors, calls: AtomicUsize::new(0), requests: Mutex::new(Vec::new()) }
        }

        fn with(mut self, pass: Pass, behavior: Behavior, delay: Duration) -> Self {
            self.behaviors.insert(pass, (behavior, delay));
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());

            let (behavior, delay) = self.behaviors[&request.pass].clone();
            tokio::time::sleep(delay).await;

            match behavior {
                Behavior::Reply(text) => Ok(text.to_string()),
                Behavior::Fail(status) => Err(PagegradeError::Provider { status, message: "boom".to_string() }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
            }
        }
    }

    struct CountingLexicon;

    impl LexiconScorer for CountingLexicon {
        fn score(&self, text: &str) -> LexiconSentiment {
            LexiconSentiment::from_score(2.0, count_words(text))
        }
    }

    const SAMPLE: &str = "Dies ist ein kurzer Beispieltext über Rust.";

    fn analyzer(generator: Arc<FakeGenerator>) -> Analyzer {
        Analyzer::new(generator, AnalysisConfig::default())
    }

    #[tokio::test]
    async fn test_all_passes_succeed() {
        let generator = Arc::new(FakeGenerator::new());
        let result = analyzer(generator.clone()).analyze(SAMPLE, "rust").await.unwrap();

        assert_eq!(generator.calls(), 4);
        assert_eq!(result.qualitative_analysis, "Gut lesbar. Verbesserungsvorschläge: Mehr Absätze.");
        assert_eq!(result.suggestions, "Verbesserungsvorschläge: Mehr Absätze.");
        assert_eq!(result.readability_score, Some(7));
        assert_eq!(result.seo_score, Some(9));
        assert_eq!(result.sentiment_score, Some(6));
        assert_eq!(result.sentiment_analysis, "6");
        assert_eq!(result.word_count, 7);
        assert_eq!(result.text_sample, SAMPLE);
        assert!(!result.is_partial());
        assert_eq!(result.lexicon_sentiment, None);
    }

    #[tokio::test]
    async fn test_requests_carry_config_and_keyphrase() {
        let generator = Arc::new(FakeGenerator::new());
        analyzer(generator.clone()).analyze(SAMPLE, "rust lernen").await.unwrap();

        let requests = generator.requests.lock().unwrap();
        let seo = requests.iter().find(|r| r.pass == Pass::Seo).unwrap();
        assert!(seo.prompt.contains("\"rust lernen\""));
        assert!(seo.prompt.contains(SAMPLE));
        assert_eq!(seo.model, "gpt-3.5-turbo");
        assert_eq!(seo.temperature, 0.2);

        let sentiment = requests.iter().find(|r| r.pass == Pass::Sentiment).unwrap();
        assert_eq!(sentiment.temperature, 0.5);
        assert!(requests.iter().all(|r| r.system.contains("objective analysis")));
    }

    #[tokio::test]
    async fn test_empty_sample_skips_generator() {
        let generator = Arc::new(FakeGenerator::new());
        let result = analyzer(generator.clone()).analyze("  \n ", "rust").await.unwrap();

        assert_eq!(generator.calls(), 0);
        assert_eq!(result, AnalysisResult::empty());
        assert_eq!(result.readability_score, None);
        assert_eq!(result.word_count, 0);
    }

    #[tokio::test]
    async fn test_failed_pass_degrades_to_none() {
        let generator = Arc::new(FakeGenerator::new().with(Pass::Seo, Behavior::Fail(500), Duration::ZERO));
        let result = analyzer(generator).analyze(SAMPLE, "rust").await.unwrap();

        assert_eq!(result.seo_score, None);
        assert_eq!(result.readability_score, Some(7));
        assert_eq!(result.failed_passes, vec![Pass::Seo]);
        assert!(result.is_partial());
    }

    #[tokio::test]
    async fn test_failed_critique_leaves_text_empty() {
        let generator = Arc::new(FakeGenerator::new().with(Pass::Critique, Behavior::Fail(429), Duration::ZERO));
        let result = analyzer(generator).analyze(SAMPLE, "rust").await.unwrap();

        assert_eq!(result.qualitative_analysis, "");
        assert_eq!(result.suggestions, "");
        assert_eq!(result.seo_score, Some(9));
        assert_eq!(result.failed_passes, vec![Pass::Critique]);
    }

    #[tokio::test]
    async fn test_all_passes_failing_is_an_error() {
        let generator = Arc::new(
            FakeGenerator::new()
                .with(Pass::Critique, Behavior::Fail(401), Duration::ZERO)
                .with(Pass::Readability, Behavior::Fail(401), Duration::ZERO)
                .with(Pass::Seo, Behavior::Fail(401), Duration::ZERO)
                .with(Pass::Sentiment, Behavior::Fail(401), Duration::ZERO),
        );
        let result = analyzer(generator).analyze(SAMPLE, "rust").await;

        assert!(matches!(result, Err(PagegradeError::Provider { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_unparseable_score_is_not_a_failure() {
        let generator =
            Arc::new(FakeGenerator::new().with(Pass::Readability, Behavior::Reply("sehr gut"), Duration::ZERO));
        let result = analyzer(generator).analyze(SAMPLE, "rust").await.unwrap();

        assert_eq!(result.readability_score, None);
        assert!(result.failed_passes.is_empty());
    }

    #[tokio::test]
    async fn test_timed_out_pass_does_not_block_others() {
        let generator = Arc::new(
            FakeGenerator::new()
                .with(Pass::Critique, Behavior::Reply("Okay."), Duration::from_millis(100))
                .with(Pass::Readability, Behavior::Reply("5"), Duration::from_millis(100))
                .with(Pass::Seo, Behavior::Hang, Duration::ZERO)
                .with(Pass::Sentiment, Behavior::Reply("8"), Duration::from_millis(100)),
        );
        let config = AnalysisConfig::default().with_pass_timeout(Duration::from_millis(300));
        let analyzer = Analyzer::new(generator, config);

        let started = Instant::now();
        let result = analyzer.analyze(SAMPLE, "rust").await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(result.seo_score, None);
        assert_eq!(result.readability_score, Some(5));
        assert_eq!(result.sentiment_score, Some(8));
        assert_eq!(result.failed_passes, vec![Pass::Seo]);
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_passes_run_concurrently() {
        let delay = Duration::from_millis(400);
        let generator = Arc::new(
            FakeGenerator::new()
                .with(Pass::Critique, Behavior::Reply("Okay."), delay)
                .with(Pass::Readability, Behavior::Reply("5"), delay)
                .with(Pass::Seo, Behavior::Reply("6"), delay)
                .with(Pass::Sentiment, Behavior::Reply("7"), delay),
        );

        let started = Instant::now();
        analyzer(generator).analyze(SAMPLE, "rust").await.unwrap();

        assert!(started.elapsed() < delay * 3, "passes were serialized");
    }

    #[tokio::test]
    async fn test_sentiment_pass_can_be_disabled() {
        let generator = Arc::new(FakeGenerator::new());
        let analyzer = Analyzer::new(generator.clone(), AnalysisConfig::default().with_sentiment(false));
        let result = analyzer.analyze(SAMPLE, "rust").await.unwrap();

        assert_eq!(generator.calls(), 3);
        assert_eq!(result.sentiment_score, None);
        assert!(result.failed_passes.is_empty());
    }

    #[tokio::test]
    async fn test_word_count_matches_truncated_sample() {
        let generator = Arc::new(FakeGenerator::new());
        let config = AnalysisConfig { max_chars: 20, ..Default::default() };
        let analyzer = Analyzer::new(generator.clone(), config);

        let result = analyzer.analyze("eins zwei drei vier fünf sechs sieben acht", "x").await.unwrap();

        assert_eq!(result.text_sample, "eins zwei drei vier");
        assert_eq!(result.word_count, 4);
        let requests = generator.requests.lock().unwrap();
        assert!(requests.iter().all(|r| r.prompt.contains("eins zwei drei vier") && !r.prompt.contains("sechs")));
    }

    #[tokio::test]
    async fn test_lexicon_cross_check() {
        let generator = Arc::new(FakeGenerator::new());
        let analyzer = analyzer(generator).with_lexicon(Arc::new(CountingLexicon));
        let result = analyzer.analyze("gut besser am besten", "x").await.unwrap();

        assert_eq!(result.lexicon_sentiment, Some(LexiconSentiment { score: 2.0, comparative: 0.5 }));
    }

    #[tokio::test]
    async fn test_analyze_content_passes_metadata_through() {
        let generator = Arc::new(FakeGenerator::new());
        let content = ExtractedContent {
            body_text: SAMPLE.to_string(),
            title: "Titel".to_string(),
            preview_image_url: Some("https://example.com/og.png".to_string()),
        };
        let result = analyzer(generator).analyze_content(&content, "rust").await.unwrap();

        assert_eq!(result.title, "Titel");
        assert_eq!(result.preview_image_url.as_deref(), Some("https://example.com/og.png"));
    }
}
