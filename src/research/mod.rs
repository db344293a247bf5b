//! Research Pipeline
//!
//! Turns a free-text query into a [`ResearchBundle`](crate::types::ResearchBundle)
//! through five sequential stages. Every stage that talks to the LLM can
//! degrade to a deterministic heuristic, and the bundle records which one
//! produced each value.
//!
//! # Architecture
//!
//! - [`coordinator::ResearchCoordinator`] - Sequences the stages
//! - [`plan::PlanGenerator`] - LLM plan with keyword-classifier fallback
//! - [`filter::ResultFilter`] - Keeps results matching the plan's targets
//! - [`scrape::ScrapeOrchestrator`] - Fetches and extracts page text
//! - [`synthesize::Synthesizer`] - LLM synthesis with template fallback
//! - [`session::SessionStats`] - Counters across runs
//!
//! # Usage
//!
//! ```ignore
//! use ares_research::research::ResearchCoordinator;
//!
//! let coordinator = ResearchCoordinator::from_config(&config)?;
//! let bundle = coordinator.research("prix immobilier Paris 2025").await?;
//!
//! println!("{}", bundle.synthesis.summary);
//! for page in bundle.scraped_pages.iter().filter(|p| p.is_success()) {
//!     println!("- {}", page.url);
//! }
//! ```
//!
//! # Research Workflow
//!
//! 1. **Plan** - Detect intent, pick target sites and query variants
//! 2. **Search** - Run up to three variants and score hits by rank
//! 3. **Filter** - Keep results from target domains or with matching content
//! 4. **Scrape** - Fetch up to six pages with a fixed timeout
//! 5. **Synthesize** - Summarise the scraped text

/// Pipeline driver.
pub mod coordinator;
/// Result filtering against target sites.
pub mod filter;
/// Research plan generation.
pub mod plan;
/// Page fetching and text extraction.
pub mod scrape;
/// Session counters.
pub mod session;
/// Summary, key points and recommendations.
pub mod synthesize;

pub use coordinator::ResearchCoordinator;
pub use session::SessionStats;
