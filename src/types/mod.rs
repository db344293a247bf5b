use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    pub plan: ResearchPlan,
    pub origin: Origin,
}

// ============= Plan Types =============

/// Coarse category assigned to a query. Drives target sites and query variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ComparisonShopping,
    PriceResearch,
    NewsResearch,
    TutorialResearch,
    #[serde(other)]
    GeneralResearch,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ComparisonShopping => "comparison_shopping",
            Intent::PriceResearch => "price_research",
            Intent::NewsResearch => "news_research",
            Intent::TutorialResearch => "tutorial_research",
            Intent::GeneralResearch => "general_research",
        }
    }

    /// Human-readable label, e.g. "Price Research"
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of content a target site is expected to provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Product,
    Articles,
    Price,
    Discussion,
    News,
    Blog,
    Tutorial,
    Video,
    Forum,
    General,
    #[serde(other)]
    Other,
}

/// Marker used in place of a domain for "any site"
pub const GENERAL_SITE: &str = "general";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSite {
    pub name: String,
    /// Domain token (e.g. "amazon.fr") or [`GENERAL_SITE`]
    pub url: String,
    pub search_type: ContentType,
}

impl TargetSite {
    pub fn new(name: &str, url: &str, search_type: ContentType) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            search_type,
        }
    }

    pub fn general(name: &str, search_type: ContentType) -> Self {
        Self::new(name, GENERAL_SITE, search_type)
    }

    pub fn is_general(&self) -> bool {
        self.url == GENERAL_SITE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub intent: Intent,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Structured research plan. Produced once per query and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub query: String,
    pub analysis: QueryAnalysis,
    pub target_sites: Vec<TargetSite>,
    pub search_queries: Vec<String>,
    pub search_strategy: Vec<String>,
}

// ============= Search Types =============

/// Raw hit as returned by a web search backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Host of `url` without a leading `www.`
    pub source: String,
    /// Rank-derived score in [0, 1]
    pub relevance_score: f32,
    /// Content type of the target site that matched this result, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<ContentType>,
}

// ============= Scrape Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Success,
    Timeout,
    Error,
}

/// Page as seen by the scrape orchestrator. For timeout/error pages the
/// `content` field carries the failure message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub status: ScrapeStatus,
    pub search_result: SearchResult,
}

impl ScrapedPage {
    pub fn is_success(&self) -> bool {
        self.status == ScrapeStatus::Success
    }
}

// ============= Synthesis Types =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub summary: String,
    pub key_points: Vec<String>,
    pub recommendations: Vec<String>,
    /// In [0, 1]
    pub confidence: f32,
    pub sources_summary: String,
}

// ============= Provenance Types =============

/// Why a heuristic value replaced a model-derived one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The completion call could not be made or returned an error
    UpstreamUnavailable { message: String },
    /// The completion text did not parse as the expected JSON
    MalformedUpstreamResponse { message: String },
    /// Nothing was available to send upstream
    NoContent,
}

impl From<&AppError> for FallbackReason {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::MalformedResponse(msg) => FallbackReason::MalformedUpstreamResponse {
                message: msg.clone(),
            },
            other => FallbackReason::UpstreamUnavailable {
                message: other.to_string(),
            },
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::UpstreamUnavailable { message } => {
                write!(f, "upstream unavailable: {}", message)
            }
            FallbackReason::MalformedUpstreamResponse { message } => {
                write!(f, "malformed upstream response: {}", message)
            }
            FallbackReason::NoContent => f.write_str("no content to analyse"),
        }
    }
}

/// Serializable provenance recorded in the bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Origin {
    Model,
    Heuristic { reason: FallbackReason },
}

impl Origin {
    pub fn is_heuristic(&self) -> bool {
        matches!(self, Origin::Heuristic { .. })
    }
}

/// Result of a stage that asks the LLM first and falls back to a heuristic.
///
/// Callers can tell a model-derived value from a heuristic one without
/// inspecting logs.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Model(T),
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Model(value) => value,
            Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Outcome::Model(_) => None,
            Outcome::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn into_parts(self) -> (T, Origin) {
        match self {
            Outcome::Model(value) => (value, Origin::Model),
            Outcome::Fallback { value, reason } => (value, Origin::Heuristic { reason }),
        }
    }
}

// ============= Bundle =============

/// Complete output of one pipeline run. Read-only once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchBundle {
    pub id: Uuid,
    pub query: String,
    pub plan: ResearchPlan,
    pub plan_origin: Origin,
    /// Number of results returned by the search stage before filtering
    pub raw_result_count: usize,
    pub search_results: Vec<SearchResult>,
    pub scraped_pages: Vec<ScrapedPage>,
    pub synthesis: Synthesis,
    pub synthesis_origin: Origin,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ResearchBundle {
    pub fn successful_pages(&self) -> usize {
        self.scraped_pages.iter().filter(|p| p.is_success()).count()
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Fetch timed out: {0}")]
    FetchTimeout(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::InvalidInput(_) => axum::http::StatusCode::BAD_REQUEST,
            AppError::Completion(_)
            | AppError::MalformedResponse(_)
            | AppError::Search(_)
            | AppError::FetchTimeout(_)
            | AppError::Fetch(_) => axum::http::StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) => {
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
