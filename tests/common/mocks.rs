//! Mock implementations for testing.
//!
//! In-memory doubles for the three external collaborators of the pipeline
//! (LLM, web search, page fetcher) so integration tests never touch the
//! network.

#![allow(dead_code)]

use ares_research::llm::{GenerationParams, LLMClient};
use ares_research::tools::{FetchedPage, PageFetcher, WebSearchClient};
use ares_research::types::{AppError, Result, SearchHit};
use ares_research::utils::config::ResearchConfig;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock LLM client with scripted replies.
///
/// Replies are consumed in order; once the queue is empty the last reply is
/// repeated. A failing client returns [`AppError::Completion`] on every call.
///
/// # Examples
///
/// ```ignore
/// // Plan reply first, synthesis reply second
/// let llm = MockLLMClient::with_responses(&[PLAN_JSON, SYNTHESIS_JSON]);
///
/// // Unreachable upstream
/// let llm = MockLLMClient::failing();
/// ```
pub struct MockLLMClient {
    responses: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
    should_fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockLLMClient {
    /// Create a mock client that always returns the given reply.
    pub fn new(response: &str) -> Self {
        Self::with_responses(&[response])
    }

    /// Create a mock client that returns the given replies in order.
    pub fn with_responses(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            last: Mutex::new(None),
            should_fail: false,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::with_responses(&[])
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn complete(&self, prompt: &str, _params: &GenerationParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if self.should_fail {
            return Err(AppError::Completion("Mock LLM failure".to_string()));
        }

        let next = self.responses.lock().pop_front();
        let mut last = self.last.lock();
        if let Some(reply) = next {
            *last = Some(reply);
        }
        (*last)
            .clone()
            .ok_or_else(|| AppError::Completion("Mock LLM has no reply".to_string()))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Mock search backend.
///
/// Every query gets the same hits, truncated to `max_results`.
pub struct MockSearchClient {
    hits: Vec<SearchHit>,
    should_fail: bool,
    queries: Mutex<Vec<(String, usize)>>,
}

impl MockSearchClient {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            should_fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// `count` hits on distinct domains `https://www.site{i}.fr/...`
    pub fn with_sites(count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| {
                    hit(
                        &format!("Résultat {}", i),
                        &format!("https://www.site{}.fr/article", i),
                        "",
                    )
                })
                .collect(),
        )
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new(Vec::new())
        }
    }

    /// Queries received, with the requested result count
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().clone()
    }
}

pub fn hit(title: &str, url: &str, snippet: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        url: url.to_string(),
        snippet: snippet.to_string(),
    }
}

#[async_trait]
impl WebSearchClient for MockSearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.queries.lock().push((query.to_string(), max_results));

        if self.should_fail {
            return Err(AppError::Search("Mock search failure".to_string()));
        }

        Ok(self.hits.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// What the mock fetcher does for one URL
#[derive(Clone)]
pub enum MockPage {
    Html(String),
    Timeout,
    Error,
}

/// Mock page fetcher keyed by URL. Unknown URLs get `default`.
pub struct MockPageFetcher {
    pages: HashMap<String, MockPage>,
    default: MockPage,
    fetches: AtomicUsize,
}

impl MockPageFetcher {
    /// Serve the same HTML for every URL
    pub fn serving(html: &str) -> Self {
        Self {
            pages: HashMap::new(),
            default: MockPage::Html(html.to_string()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<FetchedPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        match self.pages.get(url).unwrap_or(&self.default) {
            MockPage::Html(body) => Ok(FetchedPage {
                status_code: 200,
                body: body.clone(),
            }),
            MockPage::Timeout => Err(AppError::FetchTimeout(format!(
                "{} did not respond in time",
                url
            ))),
            MockPage::Error => Err(AppError::Fetch(format!("Cannot reach {}", url))),
        }
    }
}

/// Article page with a title and one paragraph
pub fn article_html(title: &str, text: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><nav>Menu</nav><article><p>{}</p></article></body></html>",
        title, text
    )
}

/// Default configuration with a pinned recency year
pub fn test_config() -> ResearchConfig {
    let mut config = ResearchConfig::default();
    config.plan.recency_year = Some(2025);
    config
}
