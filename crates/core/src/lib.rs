//! Fetch a web page, extract a bounded text sample, and rate it for
//! readability, SEO and sentiment with a text-generation service.
//!
//! The pipeline runs in strict sequence per request:
//!
//! 1. [`extract`] turns raw HTML into an [`ExtractedContent`] sample
//! 2. [`Analyzer`] fans the sample out to the analysis passes and folds the
//!    answers into an [`AnalysisResult`]
//!
//! [`PageAnalysisService`] wires both behind the one request/response
//! operation used by the CLI and the HTTP server.

pub mod analysis;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod metadata;
pub mod parse;
pub mod preprocess;
pub mod prompts;
pub mod provider;
pub mod response;
pub mod sentiment;
pub mod service;

pub use analysis::{AnalysisResult, Analyzer};
pub use config::{AnalysisConfig, ProviderConfig, ProviderSettings, RetryPolicy};
pub use error::{ErrorKind, PagegradeError, Result};
pub use extract::{ExtractConfig, ExtractedContent, MAX_SAMPLE_CHARS, MIN_WORDS_PER_LINE};
pub use extract::{count_words, extract, extract_with_config, truncate_chars};
pub use fetch::{FetchConfig, HttpFetcher, PageFetcher};
pub use fetch::{fetch_file, fetch_stdin, fetch_url};
pub use formatters::{JsonConfig, TextConfig, TextFormatter, convert_to_json, convert_to_text, extracted_to_json};
pub use metadata::PageMetadata;
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_html;
pub use provider::{GenerationRequest, OpenAiClient, Pass, TextGenerator};
pub use response::{SUGGESTION_MARKERS, extract_suggestions, parse_score};
pub use sentiment::{LexiconScorer, LexiconSentiment};
pub use service::{AnalyzeRequest, ErrorBody, PageAnalysisService};
