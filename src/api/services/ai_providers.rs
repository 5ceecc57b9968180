//! Upstream model provider adapters.
//!
//! Each adapter turns (system prompt, user prompt, model) into one HTTP call
//! against its provider and decodes the reply into plain text. Replies are
//! decoded against explicit response types; a missing success field is a
//! decode failure. No call is retried.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound for a single upstream call.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest slice of an unparseable error body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Generation failures.
#[derive(Error, Debug)]
pub enum AiError {
    /// Provider credentials are missing; raised before any network call
    #[error("{0}")]
    Configuration(String),
    /// Connection failure or timeout
    #[error("Failed to reach AI provider: {0}")]
    Transport(#[source] reqwest::Error),
    /// Non-2xx reply
    #[error("AI provider returned error {status}: {message}")]
    UpstreamStatus { status: u16, message: String },
    /// 2xx reply without the expected content
    #[error("Invalid AI provider response: {0}")]
    Decode(String),
}

impl AiError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, AiError::Configuration(_))
    }
}

/// Sampling parameters shared by both providers.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// One upstream provider.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Run one generation and return the fence-stripped text.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
    ) -> Result<String, AiError>;
}

/// Build the HTTP client used for upstream calls.
pub fn build_http_client() -> Result<Client, AiError> {
    Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()
        .map_err(|e| AiError::Transport(e.without_url()))
}

/// Remove markdown code-fence markers and surrounding whitespace.
///
/// Strips "```mermaid", then "```json", then "```". Applying it twice gives
/// the same result as applying it once.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```mermaid", "")
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

fn require_key<'a>(key: Option<&'a str>, name: &str) -> Result<&'a str, AiError> {
    match key {
        Some(k) if !k.trim().is_empty() => Ok(k),
        _ => Err(AiError::Configuration(format!("{} is not configured", name))),
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Error envelope used by both providers on failure.
#[derive(Debug, Deserialize)]
struct ProviderErrorEnvelope {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

fn provider_error_message(body: &str) -> String {
    match serde_json::from_str::<ProviderErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

/// Read the reply body, turning non-2xx statuses into errors.
async fn read_body(response: reqwest::Response) -> Result<String, AiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AiError::Transport(e.without_url()))?;

    if !status.is_success() {
        return Err(AiError::UpstreamStatus {
            status: status.as_u16(),
            message: provider_error_message(&body),
        });
    }

    Ok(body)
}

// ---------------------------------------------------------------------------
// Gemini (generateContent)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiRequestContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiRequestContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: String,
}

impl GeminiResponse {
    fn into_text(self) -> Result<String, AiError> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| AiError::Decode("no candidates returned".to_string()))
    }
}

/// Adapter for the Gemini `generateContent` API.
///
/// The system prompt and the user prompt travel together in a single part.
pub struct GeminiAdapter {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    params: GenerationParams,
}

impl GeminiAdapter {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
            params,
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
    ) -> Result<String, AiError> {
        let api_key = require_key(self.api_key.as_deref(), "GEMINI_API_KEY")?;

        let url = join_url(
            &self.base_url,
            &format!("/v1/models/{}:generateContent", model),
        );
        let request = GeminiRequest {
            contents: vec![GeminiRequestContent {
                parts: vec![GeminiRequestPart {
                    text: format!("{}\n\nUser request: {}", system_prompt, user_prompt),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.params.temperature,
                max_output_tokens: self.params.max_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.without_url()))?;

        let body = read_body(response).await?;
        let decoded: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::Decode(format!("Gemini reply: {}", e)))?;

        Ok(strip_code_fences(&decoded.into_text()?))
    }
}

// ---------------------------------------------------------------------------
// Generic chat completion (OpenAI-compatible)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatRequestMessage<'a>; 2],
    temperature: f32,
    max_completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatRequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl ChatCompletionResponse {
    fn into_text(self) -> Result<String, AiError> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiError::Decode("no choices returned".to_string()))
    }
}

/// Adapter for OpenAI-compatible `/v1/chat/completions` endpoints.
pub struct ChatCompletionAdapter {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    params: GenerationParams,
}

impl ChatCompletionAdapter {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into(),
            params,
        }
    }
}

#[async_trait]
impl ProviderAdapter for ChatCompletionAdapter {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
    ) -> Result<String, AiError> {
        let api_key = require_key(self.api_key.as_deref(), "AIHUBMIX_API_KEY")?;

        let url = join_url(&self.base_url, "/v1/chat/completions");
        let request = ChatCompletionRequest {
            model,
            messages: [
                ChatRequestMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatRequestMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.params.temperature,
            max_completion_tokens: self.params.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.without_url()))?;

        let body = read_body(response).await?;
        let decoded: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::Decode(format!("chat completion reply: {}", e)))?;

        Ok(strip_code_fences(&decoded.into_text()?))
    }
}
