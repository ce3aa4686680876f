//! HTML parsing and DOM querying.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use pagegrade_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{Html, Selector};

use crate::preprocess::{self, PreprocessConfig};
use crate::{PagegradeError, Result};

/// Represents a parsed HTML document.
///
/// A Document wraps an HTML page and provides methods for querying elements
/// using CSS selectors and reading page metadata.
///
/// # Example
///
/// ```rust
/// use pagegrade_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string without preprocessing.
    ///
    /// html5ever recovers from any malformed input, so this never fails in
    /// practice; the `Result` keeps the signature stable for callers.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Parses HTML after stripping boilerplate elements.
    ///
    /// See [`preprocess::preprocess_html`] for what is removed.
    pub fn parse_cleaned(html: &str, config: &PreprocessConfig) -> Result<Self> {
        let cleaned = preprocess::preprocess_html(html, config);
        Self::parse(&cleaned)
    }

    /// Gets the underlying `scraper::Html` instance.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`PagegradeError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagegrade_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = compile(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Gets the content of the `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PagegradeError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// A wrapper around scraper's ElementRef.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Whether the element contains any non-whitespace text.
    pub fn has_text(&self) -> bool {
        self.element.text().any(|t| !t.trim().is_empty())
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the wrapped `scraper::ElementRef`.
    pub fn element_ref(&self) -> scraper::ElementRef<'a> {
        self.element
    }
}
