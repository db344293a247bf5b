//! LLM Client abstractions and provider management
//!
//! The research pipeline treats the model as a text-in/text-out service:
//! - **Mistral**: chat completions at `api.mistral.ai` (default)
//! - **OpenAI**: any OpenAI-compatible chat completions endpoint
//! - **Ollama**: local inference via `/api/chat`

use crate::types::{AppError, Result};
use crate::utils::config::{LlmConfig, LlmProviderKind};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Sampling parameters sent with a single completion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    /// Upper bound on generated tokens; `None` leaves it to the provider
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    pub fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens: Some(max_tokens),
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
        }
    }
}

/// Generic LLM client trait for provider abstraction
///
/// Implementations must return [`AppError::Completion`] when the remote call
/// cannot be completed (network failure, non-2xx status, malformed body).
/// They never substitute a default text for a failed call.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion for a single user prompt
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String>;

    /// Generate with default sampling parameters
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(prompt, &GenerationParams::default()).await
    }

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// Mistral AI chat completions
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Mistral {
    ///     api_key: Some("...".to_string()),
    ///     api_base: "https://api.mistral.ai/v1".to_string(),
    ///     model: "mistral-small-latest".to_string(),
    /// };
    /// ```
    Mistral {
        api_key: Option<String>,
        api_base: String,
        model: String,
    },

    /// OpenAI API provider (including compatible APIs such as OpenRouter)
    OpenAI {
        api_key: Option<String>,
        api_base: String,
        model: String,
    },

    /// Ollama local LLM provider
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Build a provider from the `[llm]` config section, resolving the API key
    /// from the environment
    pub fn from_config(config: &LlmConfig) -> Self {
        match config.provider {
            LlmProviderKind::Mistral => Provider::Mistral {
                api_key: config.api_key(),
                api_base: config.api_base().to_string(),
                model: config.model().to_string(),
            },
            LlmProviderKind::OpenAI => Provider::OpenAI {
                api_key: config.api_key(),
                api_base: config.api_base().to_string(),
                model: config.model().to_string(),
            },
            LlmProviderKind::Ollama => Provider::Ollama {
                base_url: config.api_base().to_string(),
                model: config.model().to_string(),
            },
        }
    }

    /// Create a client instance for this provider
    ///
    /// A missing API key is not an error here: the client is still built and
    /// every call fails with [`AppError::Completion`], which the pipeline
    /// turns into a heuristic fallback.
    pub fn create_client(&self, timeout: Duration) -> Result<Arc<dyn LLMClient>> {
        match self {
            Provider::Mistral {
                api_key,
                api_base,
                model,
            } => Ok(Arc::new(super::openai::OpenAIClient::new(
                "Mistral",
                api_key.clone(),
                api_base,
                model.clone(),
                timeout,
            )?)),

            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => Ok(Arc::new(super::openai::OpenAIClient::new(
                "OpenAI",
                api_key.clone(),
                api_base,
                model.clone(),
                timeout,
            )?)),

            Provider::Ollama { base_url, model } => Ok(Arc::new(
                super::ollama::OllamaClient::new(base_url, model.clone(), timeout)?,
            )),
        }
    }

    /// Whether the provider needs an API key that is currently missing
    pub fn missing_api_key(&self) -> bool {
        match self {
            Provider::Mistral { api_key, .. } | Provider::OpenAI { api_key, .. } => {
                api_key.is_none()
            }
            Provider::Ollama { .. } => false,
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Mistral { .. } => "Mistral",
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::Mistral { model, .. }
            | Provider::OpenAI { model, .. }
            | Provider::Ollama { model, .. } => model,
        }
    }
}

/// Build an HTTP client with the given request timeout
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}
