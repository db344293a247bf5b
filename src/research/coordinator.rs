use crate::{
    llm::{GenerationParams, LLMClient, Provider},
    research::{
        filter::ResultFilter, plan::PlanGenerator, scrape::ScrapeOrchestrator,
        synthesize::Synthesizer,
    },
    tools::{search::rank_hits, DuckDuckGoSearch, HttpPageFetcher, PageFetcher, WebSearchClient},
    types::{AppError, Outcome, ResearchBundle, ResearchPlan, Result, SearchResult},
    utils::config::{ResearchConfig, MAX_RESULTS_PER_QUERY_CEILING},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Runs plan → search → filter → scrape → synthesize for one query at a time.
///
/// Built once from configuration and shared (behind an `Arc` in the server).
/// Holds no per-run state, so concurrent runs do not interfere.
pub struct ResearchCoordinator {
    planner: PlanGenerator,
    search: Arc<dyn WebSearchClient>,
    filter: ResultFilter,
    scraper: ScrapeOrchestrator,
    synthesizer: Synthesizer,
    max_query_variants: usize,
    max_results_per_query: usize,
    rank_decay: f32,
}

impl ResearchCoordinator {
    /// Build with the default collaborators: the configured LLM provider,
    /// DuckDuckGo search and the reqwest page fetcher.
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        let provider = Provider::from_config(&config.llm);
        if provider.missing_api_key() {
            warn!(
                "{} is not set; {} calls will fail and heuristic fallbacks will be used",
                config.llm.api_key_env().unwrap_or("API key"),
                provider.name()
            );
        }

        let llm = provider.create_client(config.llm.timeout())?;
        let fetcher = HttpPageFetcher::new(&config.scrape.user_agent)?;

        Ok(Self::new(
            config,
            llm,
            Arc::new(DuckDuckGoSearch::new()),
            Arc::new(fetcher),
        ))
    }

    pub fn new(
        config: &ResearchConfig,
        llm: Arc<dyn LLMClient>,
        search: Arc<dyn WebSearchClient>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        let recency_year = config.plan.recency_year();

        Self {
            planner: PlanGenerator::new(
                llm.clone(),
                GenerationParams::new(config.llm.plan_temperature, config.llm.plan_max_tokens),
                recency_year,
            ),
            search,
            filter: ResultFilter::new(config.filter.max_results, recency_year),
            scraper: ScrapeOrchestrator::new(fetcher, &config.scrape),
            synthesizer: Synthesizer::new(
                llm,
                GenerationParams::new(
                    config.llm.synthesis_temperature,
                    config.llm.synthesis_max_tokens,
                ),
                config.synthesis.clone(),
            ),
            max_query_variants: config.search.max_query_variants,
            max_results_per_query: config
                .search
                .max_results_per_query
                .min(MAX_RESULTS_PER_QUERY_CEILING),
            rank_decay: config.search.rank_decay,
        }
    }

    /// Generate a plan only
    pub async fn plan(&self, query: &str) -> Result<Outcome<ResearchPlan>> {
        let query = validate_query(query)?;
        Ok(self.planner.generate_plan(query).await)
    }

    /// Execute the full pipeline. Only an empty query is an error; every
    /// upstream failure degrades into a heuristic value inside the bundle.
    pub async fn research(&self, query: &str) -> Result<ResearchBundle> {
        let query = validate_query(query)?;
        let id = Uuid::new_v4();
        let started = Instant::now();

        let bundle = async {
            let (plan, plan_origin) = self.planner.generate_plan(query).await.into_parts();
            info!(
                intent = %plan.analysis.intent,
                targets = plan.target_sites.len(),
                variants = plan.search_queries.len(),
                heuristic = plan_origin.is_heuristic(),
                "Plan ready"
            );

            let raw_results = self.run_searches(&plan).await;
            let raw_result_count = raw_results.len();

            let search_results = self.filter.filter_results(raw_results, &plan.target_sites);
            info!(
                raw = raw_result_count,
                kept = search_results.len(),
                "Results filtered"
            );

            let scraped_pages = self.scraper.scrape_all(&search_results).await;

            let (synthesis, synthesis_origin) = self
                .synthesizer
                .synthesize(query, &scraped_pages)
                .await
                .into_parts();

            let duration_ms = started.elapsed().as_millis() as u64;
            info!(
                confidence = synthesis.confidence,
                duration_ms, "Research complete"
            );

            ResearchBundle {
                id,
                query: query.to_string(),
                plan,
                plan_origin,
                raw_result_count,
                search_results,
                scraped_pages,
                synthesis,
                synthesis_origin,
                timestamp: Utc::now(),
                duration_ms,
            }
        }
        .instrument(info_span!("research", %id, query))
        .await;

        Ok(bundle)
    }

    /// Search the first query variants in order and concatenate the scored
    /// batches. A failing variant contributes nothing.
    async fn run_searches(&self, plan: &ResearchPlan) -> Vec<SearchResult> {
        let mut results = Vec::new();

        for variant in plan.search_queries.iter().take(self.max_query_variants) {
            match self
                .search
                .search(variant, self.max_results_per_query)
                .await
            {
                Ok(mut hits) => {
                    hits.truncate(self.max_results_per_query);
                    info!(
                        query = %variant,
                        hits = hits.len(),
                        backend = self.search.name(),
                        "Search done"
                    );
                    results.extend(rank_hits(hits, self.rank_decay));
                }
                Err(e) => warn!(query = %variant, "Search failed: {}", e),
            }
        }

        results
    }
}

fn validate_query(query: &str) -> Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("query must not be empty".to_string()));
    }
    Ok(query)
}
