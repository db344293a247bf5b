//! Page scraping
//!
//! Fetches up to `max_pages` filtered results one after another and turns
//! each response into a [`ScrapedPage`]. Failures never propagate: a page that
//! times out or errors is recorded with that status and the failure message
//! as its content.

use crate::tools::PageFetcher;
use crate::types::{AppError, ScrapeStatus, ScrapedPage, SearchResult};
use crate::utils::config::ScrapeConfig;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Elements whose text never counts as page content
const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// Main-content candidates, in priority order
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    ".content",
    "#content",
    ".post",
    ".article",
    "div[role=\"main\"]",
    ".main-content",
    ".entry-content",
];

const UNTITLED: &str = "Untitled page";

pub struct ScrapeOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    max_pages: usize,
    timeout: Duration,
    max_chars: usize,
}

impl ScrapeOrchestrator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            max_pages: config.max_pages,
            timeout: config.timeout(),
            max_chars: config.max_chars,
        }
    }

    /// Scrape the first `max_pages` results sequentially
    pub async fn scrape_all(&self, results: &[SearchResult]) -> Vec<ScrapedPage> {
        let mut pages = Vec::with_capacity(results.len().min(self.max_pages));

        for result in results.iter().take(self.max_pages) {
            pages.push(self.scrape(result).await);
        }

        let ok = pages.iter().filter(|p| p.is_success()).count();
        info!(scraped = pages.len(), successful = ok, "Scraping finished");
        pages
    }

    /// Scrape one result. Always returns a page.
    pub async fn scrape(&self, result: &SearchResult) -> ScrapedPage {
        let url = result.url.as_str();
        debug!(url, "Fetching page");

        // Bound the call even if a fetcher ignores its timeout argument
        let fetched =
            match tokio::time::timeout(self.timeout, self.fetcher.fetch(url, self.timeout)).await {
                Ok(fetched) => fetched,
                Err(_) => Err(AppError::FetchTimeout(format!(
                    "{} did not respond within {}s",
                    url,
                    self.timeout.as_secs()
                ))),
            };

        match fetched {
            Ok(page) => {
                let (title, content) = extract_page(&page.body, self.max_chars);
                ScrapedPage {
                    url: url.to_string(),
                    title,
                    word_count: content.split_whitespace().count(),
                    content,
                    status: ScrapeStatus::Success,
                    search_result: result.clone(),
                }
            }
            Err(AppError::FetchTimeout(message)) => {
                warn!(url, "Page fetch timed out");
                self.failed_page(result, "Timeout", &message, ScrapeStatus::Timeout)
            }
            Err(e) => {
                warn!(url, "Page fetch failed: {}", e);
                self.failed_page(result, "Connection error", &e.to_string(), ScrapeStatus::Error)
            }
        }
    }

    /// Page carrying the failure message, cut to `max_chars` like any other text
    fn failed_page(
        &self,
        result: &SearchResult,
        title: &str,
        message: &str,
        status: ScrapeStatus,
    ) -> ScrapedPage {
        ScrapedPage {
            url: result.url.clone(),
            title: title.to_string(),
            content: message.chars().take(self.max_chars).collect(),
            word_count: 0,
            status,
            search_result: result.clone(),
        }
    }
}

/// Extract `(title, text)` from an HTML document.
///
/// Text comes from the first content selector with a non-empty match, else
/// from `<body>`. Text nodes are trimmed and joined with single spaces, then
/// the result is cut to `max_chars` characters.
pub fn extract_page(html: &str, max_chars: usize) -> (String, String) {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let main_text = CONTENT_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .filter_map(|sel| document.select(&sel).next())
        .map(|el| visible_text(&el))
        .find(|text| !text.is_empty());

    let text = main_text.unwrap_or_else(|| {
        Selector::parse("body")
            .ok()
            .and_then(|sel| document.select(&sel).next())
            .map(|body| visible_text(&body))
            .unwrap_or_default()
    });

    (title, text.chars().take(max_chars).collect())
}

fn visible_text(element: &ElementRef<'_>) -> String {
    if is_stripped(element) {
        return String::new();
    }
    let mut parts = Vec::new();
    collect_text(element, &mut parts);
    parts.join(" ")
}

fn is_stripped(element: &ElementRef<'_>) -> bool {
    STRIPPED_TAGS.contains(&element.value().name())
        || element.ancestors().any(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| STRIPPED_TAGS.contains(&el.name()))
        })
}

fn collect_text<'a>(element: &ElementRef<'a>, parts: &mut Vec<&'a str>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed);
                }
            }
            Node::Element(el) if STRIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, parts);
                }
            }
            _ => {}
        }
    }
}
