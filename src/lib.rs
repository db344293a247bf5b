//! # ares-research - Web Research Agent
//!
//! Turns a free-text query into a structured research bundle: an LLM-built
//! research plan, web search results filtered against the plan's target
//! sites, scraped page text and a synthesized summary with key points,
//! recommendations and a confidence score.
//!
//! ## Overview
//!
//! ares-research can be used in two ways:
//!
//! 1. **As a CLI / server** - Run the `ares-research` binary
//! 2. **As a library** - Build a [`ResearchCoordinator`] in your own project
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use ares_research::{ResearchConfig, ResearchCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ResearchConfig::load_or_default("research.toml")?;
//!     let coordinator = ResearchCoordinator::from_config(&config)?;
//!
//!     let bundle = coordinator.research("meilleurs casques moto 2025").await?;
//!     println!("{}", bundle.synthesis.summary);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Custom Collaborators
//!
//! The LLM, the search engine and the page fetcher are traits, so any of
//! them can be swapped:
//!
//! ```rust,ignore
//! use ares_research::{LLMClient, ResearchCoordinator, tools::{PageFetcher, WebSearchClient}};
//! use std::sync::Arc;
//!
//! let coordinator = ResearchCoordinator::new(
//!     &config,
//!     Arc::new(MyLlm::default()),
//!     Arc::new(MySearch::default()),
//!     Arc::new(MyFetcher::default()),
//! );
//! ```
//!
//! ## Degradation
//!
//! Nothing upstream is fatal. When the LLM is unreachable or answers with
//! something that is not the expected JSON, the plan comes from a keyword
//! classifier and the synthesis from templates. The bundle records this in
//! `plan_origin` and `synthesis_origin`.
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`cli`] - Command-line parsing and terminal output
//! - [`llm`] - LLM client implementations
//! - [`research`] - The pipeline stages and their driver
//! - [`tools`] - Web search and page fetching
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration loading

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Research pipeline stages and coordination.
pub mod research;
/// Web search and page fetching.
pub mod tools;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, Provider};
pub use research::{ResearchCoordinator, SessionStats};
pub use types::{AppError, ResearchBundle, Result};
pub use utils::config::ResearchConfig;

use parking_lot::RwLock;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<ResearchConfig>,
    /// Pipeline driver, shared by all requests
    pub coordinator: Arc<ResearchCoordinator>,
    /// Counters across runs handled by this process
    pub session: Arc<RwLock<SessionStats>>,
}

impl AppState {
    pub fn new(config: ResearchConfig, coordinator: ResearchCoordinator) -> Self {
        Self {
            config: Arc::new(config),
            coordinator: Arc::new(coordinator),
            session: Arc::new(RwLock::new(SessionStats::default())),
        }
    }
}
