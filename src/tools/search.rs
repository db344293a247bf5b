//! Web search backed by daedra
//!
//! This module provides web search capabilities via the daedra crate,
//! which uses DuckDuckGo as the search backend, plus the rank-based scoring
//! applied to each batch of hits.

use crate::types::{AppError, Result, SearchHit, SearchResult};
use async_trait::async_trait;

/// Anything that turns a query into an ordered list of hits
#[async_trait]
pub trait WebSearchClient: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &str;
}

/// Web search powered by daedra (DuckDuckGo)
pub struct DuckDuckGoSearch;

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebSearchClient for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: max_results,
                ..Default::default()
            }),
        };

        match daedra::tools::search::perform_search(&search_args).await {
            Ok(response) => Ok(response
                .data
                .iter()
                .take(max_results)
                .map(|r| SearchHit {
                    title: r.title.to_string(),
                    url: r.url.to_string(),
                    snippet: r.description.to_string(),
                })
                .collect()),
            Err(e) => Err(AppError::Search(format!("Search failed: {}", e))),
        }
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

/// Host of `url` without a leading `www.`, or `"unknown"` when the URL does
/// not parse or has no host.
pub fn source_domain(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .map(|host| host.trim_start_matches("www.").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Relevance of the hit at `rank` (0-based) within its batch:
/// `1.0 - rank_decay * rank`, clamped to [0, 1].
pub fn relevance_for_rank(rank: usize, rank_decay: f32) -> f32 {
    (1.0 - rank_decay * rank as f32).clamp(0.0, 1.0)
}

/// Score one batch of hits, preserving the backend's order
pub fn rank_hits(hits: Vec<SearchHit>, rank_decay: f32) -> Vec<SearchResult> {
    hits.into_iter()
        .enumerate()
        .map(|(rank, hit)| SearchResult {
            source: source_domain(&hit.url),
            relevance_score: relevance_for_rank(rank, rank_decay),
            title: hit.title,
            url: hit.url,
            snippet: hit.snippet,
            target_type: None,
        })
        .collect()
}
