//! Content extraction: raw HTML to a bounded plain-text sample.
//!
//! The extractor picks a main-content region with a fixed selector chain,
//! converts it to line-oriented text, drops short lines (menu labels, button
//! captions) and cuts the result to a character budget. It never fails:
//! anything it cannot make sense of ends up as an empty sample.
//!
//! # Example
//!
//! ```rust
//! use pagegrade_core::extract;
//!
//! let content = extract("<h1>Test</h1><p>word word word word word.</p>");
//! assert_eq!(content.title, "Test");
//! assert_eq!(content.body_text, "word word word word word.");
//! assert_eq!(content.word_count(), 5);
//! ```

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::Document;
use crate::preprocess::PreprocessConfig;

/// Upper bound on the characters handed to the analysis passes.
pub const MAX_SAMPLE_CHARS: usize = 5000;

/// Lines with fewer words than this are treated as UI chrome.
pub const MIN_WORDS_PER_LINE: usize = 4;

/// Main-content selectors in priority order. The first one matching an
/// element with visible text wins; `body` is the last resort.
const CONTENT_SELECTORS: &[&str] = &[
    "main",
    "[role=\"main\"]",
    "#content",
    "#main-content",
    ".entry-content",
    ".post-content",
    ".article-content",
    ".article-body",
    "article",
    "[class*=\"content\"]",
    "[id*=\"content\"]",
    "[class*=\"post\"]",
    "[class*=\"article\"]",
    "body",
];

/// Headings collected for the outline block.
const OUTLINE_SELECTOR: &str = "h1, h2, h3";

/// Tags that start and end a line of their own.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6", "li", "main",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Never part of the text, even if preprocessing was disabled.
const NON_CONTENT_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Configuration for content extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Character budget of the body text
    pub max_chars: usize,
    /// Minimum whitespace-delimited words for a line to survive
    pub min_words_per_line: usize,
    /// Boilerplate removal applied before the region is chosen
    pub preprocess: PreprocessConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_chars: MAX_SAMPLE_CHARS,
            min_words_per_line: MIN_WORDS_PER_LINE,
            preprocess: PreprocessConfig::default(),
        }
    }
}

/// The result of content extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    /// Newline-joined, whitespace-normalized text sample
    pub body_text: String,
    /// First `<h1>` or `<title>` text, possibly empty
    pub title: String,
    /// Social preview image URL, if the page declares one
    pub preview_image_url: Option<String>,
}

impl ExtractedContent {
    /// Whether extraction produced no usable text.
    pub fn is_empty(&self) -> bool {
        self.body_text.trim().is_empty()
    }

    /// Whitespace-delimited token count of the body text.
    pub fn word_count(&self) -> usize {
        count_words(&self.body_text)
    }
}

/// Extracts a text sample and metadata from raw HTML with default settings.
pub fn extract(html: &str) -> ExtractedContent {
    extract_with_config(html, None, &ExtractConfig::default())
}

/// Extracts a text sample and metadata from raw HTML.
///
/// `base_url` is only used to resolve a relative preview image URL.
pub fn extract_with_config(html: &str, base_url: Option<&Url>, config: &ExtractConfig) -> ExtractedContent {
    if html.trim().is_empty() {
        return ExtractedContent::default();
    }

    let metadata = match Document::parse(html) {
        Ok(doc) => doc.extract_metadata(base_url),
        Err(e) => {
            warn!(error = %e, "metadata extraction failed");
            Default::default()
        }
    };

    let body_text = match Document::parse_cleaned(html, &config.preprocess) {
        Ok(doc) => body_text(&doc, config),
        Err(e) => {
            warn!(error = %e, "body extraction failed");
            String::new()
        }
    };

    debug!(chars = body_text.chars().count(), words = count_words(&body_text), "extracted text sample");

    ExtractedContent { body_text, title: metadata.title, preview_image_url: metadata.preview_image_url }
}

fn body_text(doc: &Document, config: &ExtractConfig) -> String {
    let min_words = config.min_words_per_line;
    let (region, body) = select_region(doc, min_words);

    let mut collector = LineCollector::default();
    for heading in outline(doc, region) {
        collector.push_text(&heading);
        collector.break_line();
    }

    let mut lines = prose_lines(collector, min_words);
    lines.extend(body);

    truncate_sample(&lines.join("\n"), config.max_chars, min_words)
}

/// Pick the main-content region by selector priority.
///
/// A candidate only wins when it yields at least one line of prose, so a
/// short label matched by a broad pattern falls through to the next selector.
fn select_region(doc: &Document, min_words: usize) -> (ElementRef<'_>, Vec<String>) {
    for selector in CONTENT_SELECTORS {
        let Ok(candidates) = doc.select(selector) else {
            continue;
        };

        for candidate in candidates.iter().filter(|el| el.has_text()) {
            let lines = region_lines(candidate.element_ref(), min_words);
            if !lines.is_empty() {
                debug!(selector, "content region selected");
                return (candidate.element_ref(), lines);
            }
        }
    }

    let root = doc.html().root_element();
    (root, region_lines(root, min_words))
}

fn region_lines(region: ElementRef<'_>, min_words: usize) -> Vec<String> {
    let mut collector = LineCollector::default();
    walk(region, &mut collector);
    prose_lines(collector, min_words)
}

/// Drops lines below the word minimum.
fn prose_lines(collector: LineCollector, min_words: usize) -> Vec<String> {
    collector
        .finish()
        .into_iter()
        .filter(|line| count_words(line) >= min_words)
        .collect()
}

/// Headings that live outside the region, in document order.
fn outline(doc: &Document, region: ElementRef<'_>) -> Vec<String> {
    let Ok(headings) = doc.select(OUTLINE_SELECTOR) else {
        return Vec::new();
    };

    headings
        .into_iter()
        .map(|h| h.element_ref())
        .filter(|h| !h.ancestors().any(|ancestor| ancestor.id() == region.id()))
        .map(|h| h.text().collect::<String>())
        .filter(|text| !text.trim().is_empty())
        .collect()
}

fn walk(element: ElementRef<'_>, out: &mut LineCollector) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_text(text);
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();

        if NON_CONTENT_TAGS.contains(&name) {
            continue;
        }

        if name == "br" {
            out.break_line();
        } else if BLOCK_TAGS.contains(&name) {
            out.break_line();
            if name == "li" {
                out.current.push_str("- ");
            }
            walk(child, out);
            out.break_line();
        } else {
            walk(child, out);
        }
    }
}

/// Accumulates inline text into whitespace-normalized lines.
#[derive(Default)]
struct LineCollector {
    lines: Vec<String>,
    current: String,
}

impl LineCollector {
    fn push_text(&mut self, text: &str) {
        let mut words = text.split_whitespace().peekable();

        if words.peek().is_none() {
            if !text.is_empty() {
                self.push_space();
            }
            return;
        }

        if text.starts_with(char::is_whitespace) {
            self.push_space();
        }

        for (i, word) in words.enumerate() {
            if i > 0 {
                self.current.push(' ');
            }
            self.current.push_str(word);
        }

        if text.ends_with(char::is_whitespace) {
            self.push_space();
        }
    }

    fn push_space(&mut self) {
        if !self.current.is_empty() && !self.current.ends_with(' ') {
            self.current.push(' ');
        }
    }

    fn break_line(&mut self) {
        let line = self.current.trim();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        self.current.clear();
    }

    fn finish(mut self) -> Vec<String> {
        self.break_line();
        self.lines
    }
}

/// Counts whitespace-delimited tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Returns the prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Char-prefix cut that also drops a trailing fragment left below the word minimum.
fn truncate_sample(text: &str, max_chars: usize, min_words: usize) -> String {
    let cut = truncate_chars(text, max_chars);
    if cut.len() == text.len() {
        return text.trim().to_string();
    }

    let mut lines: Vec<&str> = cut.lines().collect();
    if let Some(last) = lines.last()
        && count_words(last) < min_words
    {
        lines.pop();
    }

    lines.join("\n").trim().to_string()
}
