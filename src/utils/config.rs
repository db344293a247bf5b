//! TOML-based configuration for the research agent
//!
//! All settings live in `research.toml`. Every section and field has a
//! default, so an empty file (or no file at all) yields a working setup.
//! Secrets are never stored in the file: the `[llm]` section names the
//! environment variable that holds the API key, and `.env` is loaded at
//! startup via `dotenvy`.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Hard ceiling on results requested per query variant
pub const MAX_RESULTS_PER_QUERY_CEILING: usize = 8;

/// Root configuration structure loaded from research.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub plan: PlanConfig,
    pub search: SearchConfig,
    pub filter: FilterConfig,
    pub scrape: ScrapeConfig,
    pub synthesis: SynthesisConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

// ============= LLM Configuration =============

/// Which completion backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    /// Mistral AI chat completions (OpenAI-compatible wire format)
    #[default]
    Mistral,
    /// Any OpenAI-compatible chat completions endpoint
    OpenAI,
    /// Local Ollama server
    Ollama,
}

impl LlmProviderKind {
    pub fn default_api_base(self) -> &'static str {
        match self {
            LlmProviderKind::Mistral => "https://api.mistral.ai/v1",
            LlmProviderKind::OpenAI => "https://api.openai.com/v1",
            LlmProviderKind::Ollama => "http://localhost:11434",
        }
    }

    /// Ollama runs locally and takes no key
    pub fn default_api_key_env(self) -> Option<&'static str> {
        match self {
            LlmProviderKind::Mistral => Some("MISTRAL_API_KEY"),
            LlmProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            LlmProviderKind::Ollama => None,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            LlmProviderKind::Mistral => "mistral-small-latest",
            LlmProviderKind::OpenAI => "gpt-4o-mini",
            LlmProviderKind::Ollama => "llama3.2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    /// Unset fields below fall back to the provider's defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Name of the environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    pub timeout_secs: u64,
    pub plan_temperature: f32,
    pub plan_max_tokens: u32,
    pub synthesis_temperature: f32,
    pub synthesis_max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::Mistral,
            model: None,
            api_base: None,
            api_key_env: None,
            timeout_secs: 30,
            plan_temperature: 0.3,
            plan_max_tokens: 1000,
            synthesis_temperature: 0.4,
            synthesis_max_tokens: 800,
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_base())
    }

    pub fn api_key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.provider.default_api_key_env())
    }

    /// Resolve the API key from the configured environment variable.
    /// Empty values count as unset.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(self.api_key_env()?)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============= Pipeline Stage Configuration =============

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Year used for the recency query variant and news filtering.
    /// Defaults to the current calendar year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recency_year: Option<i32>,
}

impl PlanConfig {
    pub fn recency_year(&self) -> i32 {
        self.recency_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_query_variants: usize,
    pub max_results_per_query: usize,
    /// Relevance lost per rank position: `score = 1.0 - rank_decay * rank`
    pub rank_decay: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_query_variants: 3,
            max_results_per_query: 5,
            rank_decay: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub max_results: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { max_results: 8 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub max_pages: usize,
    pub timeout_secs: u64,
    /// Maximum characters of extracted text kept per page
    pub max_chars: usize,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_pages: 6,
            timeout_secs: 10,
            max_chars: 5000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Characters of each page sent to the LLM
    pub excerpt_chars: usize,
    /// Heuristic confidence: `min(cap, base + per_page * successful_pages)`
    pub confidence_base: f32,
    pub confidence_per_page: f32,
    pub confidence_cap: f32,
    /// Confidence reported when no page could be scraped
    pub no_content_confidence: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: 1000,
            confidence_base: 0.2,
            confidence_per_page: 0.15,
            confidence_cap: 0.8,
            no_content_confidence: 0.1,
        }
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for crate::types::AppError {
    fn from(err: ConfigError) -> Self {
        crate::types::AppError::Config(err.to_string())
    }
}

impl ResearchConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::FileNotFound(path)) => {
                warn!("{} not found, using default configuration", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ResearchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject limits and constants the pipeline cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn unit_interval(name: &str, value: f32) -> Result<(), ConfigError> {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
            Ok(())
        }

        fn non_zero(name: &str, value: usize) -> Result<(), ConfigError> {
            if value == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
            Ok(())
        }

        for (name, value) in [
            ("llm.model", &self.llm.model),
            ("llm.api_base", &self.llm.api_base),
            ("llm.api_key_env", &self.llm.api_key_env),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must not be empty when set",
                    name
                )));
            }
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "llm.timeout_secs must be greater than zero".to_string(),
            ));
        }
        for (name, temp) in [
            ("llm.plan_temperature", self.llm.plan_temperature),
            ("llm.synthesis_temperature", self.llm.synthesis_temperature),
        ] {
            if !(0.0..=2.0).contains(&temp) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 0.0 and 2.0, got {}",
                    name, temp
                )));
            }
        }

        non_zero("search.max_query_variants", self.search.max_query_variants)?;
        non_zero(
            "search.max_results_per_query",
            self.search.max_results_per_query,
        )?;
        if self.search.max_results_per_query > MAX_RESULTS_PER_QUERY_CEILING {
            return Err(ConfigError::ValidationError(format!(
                "search.max_results_per_query must be at most {}, got {}",
                MAX_RESULTS_PER_QUERY_CEILING, self.search.max_results_per_query
            )));
        }
        unit_interval("search.rank_decay", self.search.rank_decay)?;

        non_zero("filter.max_results", self.filter.max_results)?;

        non_zero("scrape.max_pages", self.scrape.max_pages)?;
        non_zero("scrape.max_chars", self.scrape.max_chars)?;
        if self.scrape.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "scrape.timeout_secs must be greater than zero".to_string(),
            ));
        }

        non_zero("synthesis.excerpt_chars", self.synthesis.excerpt_chars)?;
        unit_interval("synthesis.confidence_base", self.synthesis.confidence_base)?;
        unit_interval(
            "synthesis.confidence_per_page",
            self.synthesis.confidence_per_page,
        )?;
        unit_interval("synthesis.confidence_cap", self.synthesis.confidence_cap)?;
        unit_interval(
            "synthesis.no_content_confidence",
            self.synthesis.no_content_confidence,
        )?;

        Ok(())
    }
}
