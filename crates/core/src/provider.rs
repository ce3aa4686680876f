//! Text-generation provider interface and its OpenAI-compatible client.
//!
//! The orchestrator only sees [`TextGenerator`]: a request goes in, plain
//! text comes out. [`OpenAiClient`] is the production implementation,
//! talking to any `/chat/completions` endpoint.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ProviderConfig, RetryPolicy};
use crate::{PagegradeError, Result};

/// One independent request/response round-trip addressing one facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pass {
    Critique,
    Readability,
    Seo,
    Sentiment,
}

impl Pass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pass::Critique => "critique",
            Pass::Readability => "readability",
            Pass::Seo => "seo",
            Pass::Sentiment => "sentiment",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a provider needs to produce one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Facet this request is for; informational for providers.
    pub pass: Pass,
    pub model: String,
    pub temperature: f32,
    pub system: String,
    pub prompt: String,
}

/// A service that turns a prompt into unstructured text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for the request.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for OpenAI-compatible chat-completion APIs.
pub struct OpenAiClient {
    client: Client,
    config: ProviderConfig,
    retry: RetryPolicy,
}

impl OpenAiClient {
    /// Creates a client from provider configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(PagegradeError::ProviderTransport)?;

        Ok(Self { client, config, retry: RetryPolicy::default() })
    }

    /// Sets the retry policy for transient transport failures.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn send_once(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatRequest {
            model: &request.model,
            temperature: request.temperature,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.prompt },
            ],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(PagegradeError::ProviderTransport)?;

        let status = response.status();
        let text = response.text().await.map_err(PagegradeError::ProviderTransport)?;

        if !status.is_success() {
            return Err(PagegradeError::Provider { status: status.as_u16(), message: provider_message(&text) });
        }

        parse_completion(&text)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.send_once(request).await {
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(pass = %request.pass, attempt, error = %e, ?delay, "transient provider failure, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => {
                    debug!(pass = %request.pass, attempts = attempt + 1, ok = result.is_ok(), "provider call finished");
                    return result;
                }
            }
        }
    }
}

/// Pulls the first choice's text out of a chat-completion body.
fn parse_completion(body: &str) -> Result<String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| PagegradeError::InvalidResponse(format!("malformed body: {}", e)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(PagegradeError::InvalidResponse("response contained no text".to_string()));
    }

    Ok(content)
}

/// Prefers the provider's own error message over the raw body.
fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "Failed to analyze the text".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
