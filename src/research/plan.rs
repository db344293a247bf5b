//! Research plan generation
//!
//! The LLM is asked for a JSON plan. When the call fails or the reply does
//! not parse, a keyword classifier produces a deterministic plan instead.
//! A parsed plan with missing fields is back-filled rather than rejected.

use crate::llm::{json::extract_json, GenerationParams, LLMClient};
use crate::types::{
    ContentType, FallbackReason, Intent, Outcome, QueryAnalysis, ResearchPlan, TargetSite,
    GENERAL_SITE,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

const COMPARISON_TERMS: &[&str] = &["meilleur", "top", "comparaison", "test", "avis"];
const PRICE_TERMS: &[&str] = &["prix", "coût", "tarif", "budget"];
const NEWS_TERMS: &[&str] = &["actualité", "news", "nouveau"];
const TUTORIAL_TERMS: &[&str] = &["comment", "guide", "tutoriel", "apprendre"];

pub struct PlanGenerator {
    llm: Arc<dyn LLMClient>,
    params: GenerationParams,
    recency_year: i32,
}

impl PlanGenerator {
    pub fn new(llm: Arc<dyn LLMClient>, params: GenerationParams, recency_year: i32) -> Self {
        Self {
            llm,
            params,
            recency_year,
        }
    }

    /// Produce a plan for `query`. Never fails: any upstream problem yields
    /// [`Outcome::Fallback`] with the rule-based plan.
    pub async fn generate_plan(&self, query: &str) -> Outcome<ResearchPlan> {
        let prompt = build_prompt(query);

        let reply = match self.llm.complete(&prompt, &self.params).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Plan generation failed, using rule-based plan: {}", e);
                return Outcome::Fallback {
                    value: fallback_plan(query, self.recency_year),
                    reason: FallbackReason::from(&e),
                };
            }
        };

        match extract_json::<RawPlan>(&reply) {
            Ok(raw) => {
                debug!(model = self.llm.model_name(), "Parsed LLM research plan");
                Outcome::Model(raw.into_plan(query))
            }
            Err(e) => {
                warn!("Unparseable plan from LLM, using rule-based plan: {}", e);
                Outcome::Fallback {
                    value: fallback_plan(query, self.recency_year),
                    reason: FallbackReason::from(&e),
                }
            }
        }
    }
}

fn build_prompt(query: &str) -> String {
    format!(
        r#"Analyse this research query and produce a research plan as JSON.

Query: "{query}"

Detect the intent of the query and return a structured plan with:
1. The detected intent, one of: comparison_shopping, price_research, news_research, tutorial_research, general_research
2. The target sites recommended for that intent
3. The search strategies
4. The query variants to run

Expected format (JSON only):
{{
    "query": "{query}",
    "analysis": {{
        "intent": "intent_type",
        "keywords": ["word1", "word2", "word3"],
        "context": "short description of the context"
    }},
    "target_sites": [
        {{"name": "Site name", "url": "domain.com", "search_type": "product"}},
        {{"name": "Other site", "url": "general", "search_type": "articles"}}
    ],
    "search_queries": [
        "{query}",
        "variant_1",
        "variant_2"
    ],
    "search_strategy": [
        "strategy_1",
        "strategy_2"
    ]
}}

Use "general" as url when any site fits. Write keywords, variants and strategies in the language of the query.
Reply with the JSON only, without any additional text."#
    )
}

/// Map a query to one of the five fixed intents by keyword family.
/// Families are checked in order; the first hit wins.
pub fn classify_intent(query: &str) -> Intent {
    let query = query.to_lowercase();
    let has_any = |terms: &[&str]| terms.iter().any(|term| query.contains(term));

    if has_any(COMPARISON_TERMS) {
        Intent::ComparisonShopping
    } else if has_any(PRICE_TERMS) {
        Intent::PriceResearch
    } else if has_any(NEWS_TERMS) {
        Intent::NewsResearch
    } else if has_any(TUTORIAL_TERMS) {
        Intent::TutorialResearch
    } else {
        Intent::GeneralResearch
    }
}

/// Canned target sites for an intent
pub fn target_sites_for(intent: Intent) -> Vec<TargetSite> {
    match intent {
        Intent::ComparisonShopping => vec![
            TargetSite::new("Amazon", "amazon.fr", ContentType::Product),
            TargetSite::new("Cdiscount", "cdiscount.com", ContentType::Product),
            TargetSite::general("Articles de test", ContentType::Articles),
        ],
        Intent::PriceResearch => vec![
            TargetSite::general("Sites de prix", ContentType::Price),
            TargetSite::general("Forums", ContentType::Discussion),
        ],
        Intent::NewsResearch => vec![
            TargetSite::general("Sites d'actualités", ContentType::News),
            TargetSite::general("Blogs spécialisés", ContentType::Blog),
        ],
        Intent::TutorialResearch => vec![
            TargetSite::general("Sites tutoriels", ContentType::Tutorial),
            TargetSite::new("YouTube", "youtube.com", ContentType::Video),
            TargetSite::general("Forums techniques", ContentType::Forum),
        ],
        Intent::GeneralResearch => vec![default_target_site()],
    }
}

fn default_target_site() -> TargetSite {
    TargetSite::general("Sites généralistes", ContentType::General)
}

fn default_strategy(query: &str) -> String {
    format!("Rechercher '{}' sur moteurs généralistes", query)
}

/// Lower-cased query words longer than two characters
pub fn query_keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// The query itself followed by the review, comparison and recency variants
pub fn query_variants(query: &str, recency_year: i32) -> Vec<String> {
    vec![
        query.to_string(),
        format!("{} avis", query),
        format!("{} comparaison", query),
        format!("{} {}", query, recency_year),
    ]
}

/// Deterministic plan used whenever the LLM plan is unavailable
pub fn fallback_plan(query: &str, recency_year: i32) -> ResearchPlan {
    let intent = classify_intent(query);

    ResearchPlan {
        query: query.to_string(),
        analysis: QueryAnalysis {
            intent,
            keywords: query_keywords(query),
            context: None,
        },
        target_sites: target_sites_for(intent),
        search_queries: query_variants(query, recency_year),
        search_strategy: vec![
            default_strategy(query),
            format!("Analyser les sites e-commerce pour '{}'", query),
            "Collecter les avis et comparaisons".to_string(),
            "Synthétiser les informations trouvées".to_string(),
        ],
    }
}

// ============= Lenient wire format =============

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlan {
    query: Option<String>,
    analysis: Option<RawAnalysis>,
    target_sites: Option<Vec<RawTargetSite>>,
    search_queries: Option<Vec<String>>,
    search_strategy: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAnalysis {
    intent: Option<Intent>,
    keywords: Option<Vec<String>>,
    context: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTargetSite {
    name: Option<String>,
    url: Option<String>,
    search_type: Option<ContentType>,
}

fn non_blank(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl RawPlan {
    /// Back-fill missing or empty fields so the plan is always usable
    fn into_plan(self, query: &str) -> ResearchPlan {
        let analysis = self.analysis.unwrap_or_default();
        let keywords = match non_blank(analysis.keywords) {
            k if k.is_empty() => query_keywords(query),
            k => k,
        };

        let mut target_sites: Vec<TargetSite> = self
            .target_sites
            .unwrap_or_default()
            .into_iter()
            .map(|site| {
                let url = site
                    .url
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| GENERAL_SITE.to_string());
                TargetSite {
                    name: site
                        .name
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| url.clone()),
                    url,
                    search_type: site.search_type.unwrap_or(ContentType::General),
                }
            })
            .collect();
        if target_sites.is_empty() {
            target_sites.push(default_target_site());
        }

        let mut search_queries = non_blank(self.search_queries);
        if search_queries.is_empty() {
            search_queries.push(query.to_string());
        }

        let mut search_strategy = non_blank(self.search_strategy);
        if search_strategy.is_empty() {
            search_strategy.push(default_strategy(query));
        }

        ResearchPlan {
            query: self
                .query
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| query.to_string()),
            analysis: QueryAnalysis {
                intent: analysis.intent.unwrap_or(Intent::GeneralResearch),
                keywords,
                context: analysis.context.filter(|c| !c.trim().is_empty()),
            },
            target_sites,
            search_queries,
            search_strategy,
        }
    }
}
