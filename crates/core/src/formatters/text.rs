use crate::analysis::AnalysisResult;

/// Configuration for the plain text report
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap the critique at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Append the analyzed text sample
    pub include_sample: bool,
}

/// Plain text formatter for rendering an analysis as a readable report
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    /// Render an analysis result
    pub fn convert(&self, result: &AnalysisResult) -> String {
        convert_to_text(result, &self.config)
    }
}

/// Render an analysis result as a plain text report
pub fn convert_to_text(result: &AnalysisResult, config: &TextConfig) -> String {
    let mut output = String::new();

    output.push_str(&generate_header(result));
    output.push('\n');

    output.push_str(&format!("Readability: {}\n", format_score(result.readability_score)));
    output.push_str(&format!("SEO:         {}\n", format_score(result.seo_score)));
    output.push_str(&format!("Sentiment:   {}\n", format_score(result.sentiment_score)));
    if let Some(lexicon) = &result.lexicon_sentiment {
        output.push_str(&format!(
            "Lexicon:     {:.1} (comparative {:.3})\n",
            lexicon.score, lexicon.comparative
        ));
    }
    output.push_str(&format!("Words:       {}\n", result.word_count));

    if !result.qualitative_analysis.is_empty() {
        output.push_str("\nAnalysis\n--------\n");
        output.push_str(&wrap_text(&result.qualitative_analysis, config.line_width));
        output.push('\n');
    }

    if !result.failed_passes.is_empty() {
        let failed: Vec<&str> = result.failed_passes.iter().map(|p| p.as_str()).collect();
        output.push_str(&format!("\nIncomplete: {} pass(es) failed\n", failed.join(", ")));
    }

    if config.include_sample && !result.text_sample.is_empty() {
        output.push_str("\nSample\n------\n");
        output.push_str(&result.text_sample);
        output.push('\n');
    }

    output.trim().to_string()
}

/// Generate a header from the page metadata
fn generate_header(result: &AnalysisResult) -> String {
    let mut header = String::new();

    if !result.title.is_empty() {
        header.push_str(&result.title);
        header.push('\n');
        header.push_str(&"=".repeat(result.title.chars().count()));
        header.push('\n');
    }

    if let Some(image) = &result.preview_image_url {
        header.push_str(&format!("Image: {}\n", image));
    }

    header
}

fn format_score(score: Option<u8>) -> String {
    match score {
        Some(score) => format!("{}/10", score),
        None => "n/a".to_string(),
    }
}

/// Wrap text to specified width, keeping paragraph breaks
fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    text.lines()
        .map(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() { String::new() } else { wrap_words(&words, width) }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap a slice of words to specified width
fn wrap_words(words: &[&str], width: usize) -> String {
    let mut lines = Vec::new();
    let mut current_line = Vec::new();
    let mut current_length = 0;

    for &word in words {
        let word_len = word.chars().count();

        if current_length == 0 {
            current_line.push(word);
            current_length = word_len;
        } else if current_length + 1 + word_len <= width {
            current_length += 1 + word_len;
            current_line.push(word);
        } else {
            lines.push(current_line.join(" "));
            current_line = vec![word];
            current_length = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line.join(" "));
    }

    lines.join("\n")
}
