use regex::Regex;

/// Elements with no informational value for the text sample.
pub const DEFAULT_STRIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "form", "button", "select", "textarea",
    "iframe", "embed", "object", "figure", "img", "picture", "video", "audio", "svg", "canvas", "aside",
];

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Tags removed together with their content
    pub strip_tags: Vec<String>,
    /// Whether to remove HTML comments
    pub remove_comments: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { strip_tags: DEFAULT_STRIP_TAGS.iter().map(|t| t.to_string()).collect(), remove_comments: true }
    }
}

/// Preprocess HTML by removing boilerplate elements
///
/// Never fails: if the rewriter rejects the input, the input is returned as-is.
pub fn preprocess_html(html: &str, config: &PreprocessConfig) -> String {
    let mut processed = if config.strip_tags.is_empty() { html.to_string() } else { remove_tags(html, config) };

    if config.remove_comments {
        processed = remove_comments(&processed);
    }

    processed
}

/// Remove the configured tags and everything inside them
fn remove_tags(html: &str, config: &PreprocessConfig) -> String {
    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: config
                .strip_tags
                .iter()
                .filter(|tag| is_plain_tag(tag))
                .map(|tag| {
                    lol_html::element!(tag.as_str(), |el| {
                        el.remove();
                        Ok(())
                    })
                })
                .collect(),
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    if rewriter.end().is_err() {
        return html.to_string();
    }

    output
}

/// Tag names only; anything else would make the selector parse panic
fn is_plain_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Remove HTML comments from the document
fn remove_comments(html: &str) -> String {
    match Regex::new(r"(?s)<!--.*?-->") {
        Ok(re) => re.replace_all(html, "").into_owned(),
        Err(_) => html.to_string(),
    }
}
