//! Error types for Pagegrade operations.
//!
//! This module defines the main error type [`PagegradeError`] which represents
//! all possible errors that can occur while fetching a page, extracting its
//! text sample, and talking to the text-generation provider.
//!
//! Unparseable model output is *not* an error: a numeric pass
//! without digits or a critique without a suggestion marker degrades to an
//! empty facet (see [`crate::response`]).
//!
//! # Example
//!
//! ```rust
//! use pagegrade_core::{ErrorKind, PagegradeError};
//!
//! let err = PagegradeError::Configuration("OPENAI_API_KEY is not set".to_string());
//! assert_eq!(err.kind(), ErrorKind::Configuration);
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::provider::Pass;

/// Main error type for fetch, extraction and analysis operations.
#[derive(Error, Debug)]
pub enum PagegradeError {
    /// The provider credential is missing.
    ///
    /// Fatal to every request; reported before any fetch is attempted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The target page answered with a non-success status.
    #[error("Fetching {url} failed with status {status}")]
    Fetch { status: u16, url: String },

    /// The target page is not an HTML document.
    #[error("{url} is not an HTML page (content type {content_type})")]
    UnsupportedContentType { content_type: String, url: String },

    /// HTTP transport errors from reqwest while fetching a page.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when a page fetch exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Standard I/O errors for file and stdin operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Extraction yielded no usable text.
    #[error("No readable text could be extracted from the page; make sure the URL points to an article or content page")]
    EmptyContent,

    /// The provider answered with a well-formed error response (quota, auth, bad request).
    #[error("Provider returned status {status}: {message}")]
    Provider { status: u16, message: String },

    /// Transport failure while talking to the provider.
    #[error("Provider request failed: {0}")]
    ProviderTransport(reqwest::Error),

    /// The provider answered 2xx but the body had no usable text.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// A single analysis pass exceeded its time budget.
    #[error("The {pass} pass timed out after {timeout_ms} ms")]
    PassTimeout { pass: Pass, timeout_ms: u64 },

    /// Output serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification of [`PagegradeError`] used by outer surfaces.
///
/// The server maps kinds to HTTP status codes and the CLI to messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid provider configuration.
    Configuration,
    /// The target page could not be retrieved.
    Fetch,
    /// The page had no usable text.
    EmptyContent,
    /// One or more model passes failed.
    Provider,
    /// Anything else.
    Internal,
}

impl PagegradeError {
    /// Classifies this error into one of the externally visible kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidUrl(_)
            | Self::Fetch { .. }
            | Self::UnsupportedContentType { .. }
            | Self::HttpError(_)
            | Self::Timeout { .. }
            | Self::FileNotFound(_)
            | Self::Io(_) => ErrorKind::Fetch,
            Self::EmptyContent => ErrorKind::EmptyContent,
            Self::Provider { .. } | Self::ProviderTransport(_) | Self::InvalidResponse(_) | Self::PassTimeout { .. } => {
                ErrorKind::Provider
            }
            Self::HtmlParseError(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Whether retrying the same provider request could change the outcome.
    ///
    /// Only transport-level failures qualify. A provider response, even an
    /// error one, is final.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ProviderTransport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

/// Result type alias for PagegradeError.
pub type Result<T> = std::result::Result<T, PagegradeError>;
