//! OpenAI-compatible chat completions client
//!
//! Used for both Mistral and OpenAI: both accept the same
//! `POST {api_base}/chat/completions` request with a bearer token.

use crate::llm::client::{http_client, GenerationParams, LLMClient};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub struct OpenAIClient {
    http: reqwest::Client,
    provider: &'static str,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAIClient {
    pub fn new(
        provider: &'static str,
        api_key: Option<String>,
        api_base: &str,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            provider,
            endpoint: chat_completions_endpoint(api_base),
            api_key,
            model,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Resolve the chat completions endpoint from a base URL
fn chat_completions_endpoint(api_base: &str) -> String {
    let base = api_base.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{}/chat/completions", base)
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Completion(format!("{} API key is not configured", self.provider))
        })?;

        let mut body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": params.temperature,
        });
        if let Some(max_tokens) = params.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Completion(format!("{} request failed: {}", self.provider, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Completion(format!(
                "{} API error ({}): {}",
                self.provider, status, text
            )));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::Completion(format!("Failed to parse {} response: {}", self.provider, e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Completion(format!("No response from {}", self.provider)))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
