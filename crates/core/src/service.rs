//! The single request/response operation exposed to callers.
//!
//! [`PageAnalysisService::analyze`] runs one request end to end:
//! configuration check, page fetch, extraction, analysis. Each request is
//! independent; the service holds no mutable state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{AnalysisResult, Analyzer};
use crate::config::{AnalysisConfig, API_KEY_ENV, ProviderSettings, RetryPolicy};
use crate::extract::{ExtractConfig, extract_with_config};
use crate::fetch::{PageFetcher, parse_page_url};
use crate::provider::OpenAiClient;
use crate::{PagegradeError, Result};

/// Input of the outbound operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    #[serde(default)]
    pub keyphrase: String,
}

impl AnalyzeRequest {
    pub fn new(url: impl Into<String>, keyphrase: impl Into<String>) -> Self {
        Self { url: url.into(), keyphrase: keyphrase.into() }
    }
}

/// Stable error shape, distinguishable from a result by its `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&PagegradeError> for ErrorBody {
    fn from(err: &PagegradeError) -> Self {
        let error = match err {
            PagegradeError::Configuration(_) => "API key is not set.".to_string(),
            other => other.to_string(),
        };
        Self { error }
    }
}

/// Fetches, extracts and analyzes one page per request.
pub struct PageAnalysisService {
    fetcher: Arc<dyn PageFetcher>,
    analyzer: Option<Analyzer>,
    extract_config: ExtractConfig,
}

impl PageAnalysisService {
    /// Builds the service from startup settings.
    ///
    /// With [`ProviderSettings::NotConfigured`] the service still starts, but
    /// every request fails with a configuration error before any network call.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>, settings: &ProviderSettings, analysis: AnalysisConfig, retry: RetryPolicy,
    ) -> Result<Self> {
        let analyzer = match settings {
            ProviderSettings::Configured(provider) => {
                let client = OpenAiClient::new(provider.clone())?.with_retry(retry);
                let analysis = AnalysisConfig { model: provider.model.clone(), ..analysis };
                Some(Analyzer::new(Arc::new(client), analysis))
            }
            ProviderSettings::NotConfigured => {
                warn!("{} is not set; analysis requests will be rejected", API_KEY_ENV);
                None
            }
        };

        Ok(Self::from_parts(fetcher, analyzer, ExtractConfig::default()))
    }

    /// Assembles the service from already-built parts.
    pub fn from_parts(fetcher: Arc<dyn PageFetcher>, analyzer: Option<Analyzer>, extract_config: ExtractConfig) -> Self {
        let extract_config = match &analyzer {
            Some(analyzer) => ExtractConfig { max_chars: analyzer.config().max_chars, ..extract_config },
            None => extract_config,
        };
        Self { fetcher, analyzer, extract_config }
    }

    pub fn is_configured(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Runs one analysis request end to end.
    ///
    /// # Errors
    ///
    /// - [`PagegradeError::Configuration`] when no provider credential is set
    /// - fetch errors when the page cannot be retrieved
    /// - [`PagegradeError::EmptyContent`] when the page has no usable text
    /// - provider errors when every analysis pass failed
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        let Some(analyzer) = &self.analyzer else {
            return Err(PagegradeError::Configuration(format!("{} is not set", API_KEY_ENV)));
        };

        let base_url = parse_page_url(&request.url)?;
        info!(url = %base_url, keyphrase = %request.keyphrase, "analyzing page");

        let html = self.fetcher.fetch(base_url.as_str()).await?;
        let content = extract_with_config(&html, Some(&base_url), &self.extract_config);

        if content.is_empty() {
            return Err(PagegradeError::EmptyContent);
        }

        let result = analyzer.analyze_content(&content, &request.keyphrase).await?;
        if result.is_partial() {
            warn!(url = %base_url, failed = ?result.failed_passes, "returning partial analysis");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticFetcher {
        html: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.to_string())
        }
    }

    #[tokio::test]
    async fn test_not_configured_rejects_before_fetch() {
        let fetcher = Arc::new(StaticFetcher { html: "<p>one two three four</p>", calls: AtomicUsize::new(0) });
        let service = PageAnalysisService::new(
            fetcher.clone(),
            &ProviderSettings::NotConfigured,
            AnalysisConfig::default(),
            RetryPolicy::none(),
        )
        .unwrap();

        let result = service.analyze(&AnalyzeRequest::new("https://example.com", "x")).await;

        assert!(!service.is_configured());
        assert!(matches!(result, Err(PagegradeError::Configuration(_))));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_error_body_for_configuration() {
        let body = ErrorBody::from(&PagegradeError::Configuration("OPENAI_API_KEY is not set".into()));
        assert_eq!(body.error, "API key is not set.");
        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({ "error": "API key is not set." }));
    }

    #[test]
    fn test_request_keyphrase_defaults_to_empty() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();
        assert_eq!(request.keyphrase, "");
    }
}
