use crate::analysis::AnalysisResult;
use crate::extract::ExtractedContent;
use crate::{PagegradeError, Result};
use serde::Serialize;

/// Configuration for JSON output
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Include the analyzed text sample
    pub include_sample: bool,
    /// Pretty print JSON output
    pub pretty: bool,
}

fn serialize<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let output = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    output.map_err(|e| PagegradeError::Serialization(e.to_string()))
}

/// Convert an analysis result to JSON
pub fn convert_to_json(result: &AnalysisResult, config: &JsonConfig) -> Result<String> {
    if config.include_sample {
        serialize(result, config.pretty)
    } else {
        let trimmed = AnalysisResult { text_sample: String::new(), ..result.clone() };
        serialize(&trimmed, config.pretty)
    }
}

/// Convert extracted content to JSON (for --extract-only)
pub fn extracted_to_json(content: &ExtractedContent, pretty: bool) -> Result<String> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ExtractOutput<'a> {
        #[serde(flatten)]
        content: &'a ExtractedContent,
        word_count: usize,
    }

    serialize(&ExtractOutput { content, word_count: content.word_count() }, pretty)
}
