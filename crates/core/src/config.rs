//! Provider and analysis configuration.
//!
//! The provider credential is read once at startup into a [`ProviderSettings`]
//! value that is handed to whoever builds the request service. A missing
//! credential is a regular variant, checked before any request work begins.

use std::env;
use std::time::Duration;

use crate::{PagegradeError, Result};

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the provider base URL.
pub const BASE_URL_ENV: &str = "PAGEGRADE_BASE_URL";
/// Environment variable overriding the model identifier.
pub const MODEL_ENV: &str = "PAGEGRADE_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Provide consistent and objective analysis.";

/// Connection settings for the text-generation provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bearer credential.
    pub api_key: String,
    /// Base URL of the chat-completions API, without trailing slash.
    pub base_url: String,
    /// Model identifier used for every pass.
    pub model: String,
    /// Transport timeout for one HTTP round-trip.
    pub request_timeout: Duration,
}

impl ProviderConfig {
    /// Creates a configuration with default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Whether a provider credential is available.
#[derive(Debug, Clone)]
pub enum ProviderSettings {
    Configured(ProviderConfig),
    NotConfigured,
}

impl ProviderSettings {
    /// Reads the provider settings from the process environment.
    ///
    /// A missing or blank `OPENAI_API_KEY` yields [`ProviderSettings::NotConfigured`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(api_key) = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty()) else {
            return Self::NotConfigured;
        };

        let mut config = ProviderConfig::new(api_key.trim());
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.with_model(model.trim());
        }

        Self::Configured(config)
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// Returns the provider configuration or a configuration error.
    pub fn require(&self) -> Result<&ProviderConfig> {
        match self {
            Self::Configured(config) => Ok(config),
            Self::NotConfigured => Err(PagegradeError::Configuration(format!("{} is not set", API_KEY_ENV))),
        }
    }
}

/// Tunables for the analysis orchestrator.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Model identifier sent with every pass.
    pub model: String,
    /// Temperature for the critique pass.
    pub critique_temperature: f32,
    /// Temperature for the readability and SEO passes.
    pub score_temperature: f32,
    /// Temperature for the sentiment pass.
    pub sentiment_temperature: f32,
    /// System instruction shared by all passes.
    pub system_instruction: String,
    /// Independent time budget for each pass.
    pub pass_timeout: Duration,
    /// Maximum characters of the text sample sent to the model.
    pub max_chars: usize,
    /// Whether to issue the sentiment pass.
    pub include_sentiment: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            critique_temperature: 0.2,
            score_temperature: 0.2,
            sentiment_temperature: 0.5,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            pass_timeout: Duration::from_secs(30),
            max_chars: crate::extract::MAX_SAMPLE_CHARS,
            include_sentiment: true,
        }
    }
}

impl AnalysisConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_pass_timeout(mut self, timeout: Duration) -> Self {
        self.pass_timeout = timeout;
        self
    }

    pub fn with_sentiment(mut self, include: bool) -> Self {
        self.include_sentiment = include;
        self
    }
}

/// Bounded retry with exponential backoff for transient provider failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 disables retrying).
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 2, base_delay: Duration::from_millis(500) }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self { max_retries: 0, base_delay: Duration::ZERO }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}
