//! AI diagram generation.
//!
//! Resolves the model name, picks a provider from it, builds the system
//! prompt, and runs exactly one upstream call through the matching adapter.

use std::fmt;
use tracing::{info, warn};

use super::ai_providers::{
    build_http_client, ChatCompletionAdapter, GeminiAdapter, GenerationParams, ProviderAdapter,
};
use super::prompt_service::PromptSelector;
use crate::config::AiConfig;
use crate::models::{ChartType, GenerationRequest, GenerationResult};

pub use super::ai_providers::AiError;

/// Upstream provider chosen for a model name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    /// Any OpenAI-compatible chat completion endpoint
    ChatCompletion,
}

impl Provider {
    /// Models whose name starts with "gemini" (case-sensitive) go to Gemini,
    /// everything else to the chat completion endpoint.
    pub fn route(model: &str) -> Self {
        if model.starts_with("gemini") {
            Provider::Gemini
        } else {
            Provider::ChatCompletion
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Gemini => f.write_str("gemini"),
            Provider::ChatCompletion => f.write_str("chat-completion"),
        }
    }
}

/// AI service for diagram generation.
pub struct AIService {
    gemini: Box<dyn ProviderAdapter>,
    chat: Box<dyn ProviderAdapter>,
    prompts: PromptSelector,
    default_model: String,
}

impl AIService {
    /// Create the service from configuration. Missing API keys are not an
    /// error here; they surface when a generation is attempted.
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let client = build_http_client()?;
        let params = GenerationParams {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        if config.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not configured");
        }
        if config.chat_api_key.is_none() {
            warn!("AIHUBMIX_API_KEY not configured");
        }

        Ok(Self::with_adapters(
            Box::new(GeminiAdapter::new(
                client.clone(),
                config.gemini_api_key.clone(),
                config.gemini_base_url.clone(),
                params,
            )),
            Box::new(ChatCompletionAdapter::new(
                client,
                config.chat_api_key.clone(),
                config.chat_base_url.clone(),
                params,
            )),
            PromptSelector::from_config(config),
            config.gemini_model.clone(),
        ))
    }

    /// Assemble the service from explicit parts.
    pub fn with_adapters(
        gemini: Box<dyn ProviderAdapter>,
        chat: Box<dyn ProviderAdapter>,
        prompts: PromptSelector,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            gemini,
            chat,
            prompts,
            default_model: default_model.into(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Model name to use for a request, falling back to the configured default.
    pub fn resolve_model(&self, model: Option<&str>) -> String {
        match model {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => self.default_model.clone(),
        }
    }

    fn adapter(&self, provider: Provider) -> &dyn ProviderAdapter {
        match provider {
            Provider::Gemini => self.gemini.as_ref(),
            Provider::ChatCompletion => self.chat.as_ref(),
        }
    }

    /// Generate diagram text for a request.
    pub async fn generate_diagram(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, AiError> {
        let model = self.resolve_model(request.model.as_deref());
        let provider = Provider::route(&model);
        let system_prompt = self
            .prompts
            .build_system_prompt(request.diagram_type, request.chart_type.as_deref());

        info!(
            provider = %provider,
            model = %model,
            diagram_type = %request.diagram_type,
            chart_type = ChartType::resolve(request.chart_type.as_deref()).name(),
            "Generating diagram"
        );

        let content = self
            .adapter(provider)
            .generate(&system_prompt, &request.prompt, &model)
            .await
            .inspect_err(|e| warn!(provider = %provider, model = %model, "AI generation failed: {}", e))?;

        Ok(GenerationResult {
            diagram_type: request.diagram_type,
            content,
        })
    }
}
