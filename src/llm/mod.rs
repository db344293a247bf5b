//! LLM Provider Clients and Abstractions
//!
//! The pipeline only needs one capability from a model: turn a prompt into
//! text. [`LLMClient::complete`] is that seam; everything provider-specific
//! lives behind it.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - Runtime provider selection, built from `[llm]` config
//! - [`json::extract_json`] - Shared parsing of JSON replies
//!
//! # Example
//!
//! ```ignore
//! use ares_research::llm::{GenerationParams, Provider};
//!
//! let provider = Provider::from_config(&config.llm);
//! let client = provider.create_client(config.llm.timeout())?;
//!
//! let text = client.complete("What is 2+2?", &GenerationParams::new(0.3, 100)).await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// JSON extraction from model replies.
pub mod json;
/// Ollama `/api/chat` client.
pub mod ollama;
/// OpenAI-compatible chat completions client (Mistral, OpenAI).
pub mod openai;

pub use client::{GenerationParams, LLMClient, Provider};
