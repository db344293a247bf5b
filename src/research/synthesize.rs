//! Synthesis of scraped pages into a summary
//!
//! Successful pages are excerpted and sent to the LLM, which answers with a
//! JSON synthesis. If the call fails or the reply does not parse, a
//! template-based synthesis is built from the page text instead. With no
//! usable page at all the LLM is never called.

use crate::llm::{json::extract_json, GenerationParams, LLMClient};
use crate::types::{FallbackReason, Outcome, ScrapedPage, Synthesis};
use crate::utils::config::SynthesisConfig;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

const MAX_KEY_POINTS: usize = 5;
const MAX_RECOMMENDATIONS: usize = 3;
const DEFAULT_MODEL_CONFIDENCE: f32 = 0.6;
const SUMMARY_SENTENCE_CHARS: usize = 200;

pub struct Synthesizer {
    llm: Arc<dyn LLMClient>,
    params: GenerationParams,
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(llm: Arc<dyn LLMClient>, params: GenerationParams, config: SynthesisConfig) -> Self {
        Self {
            llm,
            params,
            config,
        }
    }

    pub async fn synthesize(&self, query: &str, pages: &[ScrapedPage]) -> Outcome<Synthesis> {
        let usable: Vec<&ScrapedPage> = pages
            .iter()
            .filter(|p| p.is_success() && !p.content.trim().is_empty())
            .collect();

        if usable.is_empty() {
            debug!("No usable page, skipping LLM synthesis");
            return Outcome::Fallback {
                value: self.no_content(),
                reason: FallbackReason::NoContent,
            };
        }

        let prompt = self.build_prompt(query, &usable);
        let reply = match self.llm.complete(&prompt, &self.params).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Synthesis failed, using heuristic summary: {}", e);
                return Outcome::Fallback {
                    value: self.heuristic(query, &usable),
                    reason: FallbackReason::from(&e),
                };
            }
        };

        match extract_json::<RawSynthesis>(&reply) {
            Ok(raw) => Outcome::Model(raw.into_synthesis(query, usable.len())),
            Err(e) => {
                warn!("Unparseable synthesis from LLM, using heuristic summary: {}", e);
                Outcome::Fallback {
                    value: self.heuristic(query, &usable),
                    reason: FallbackReason::from(&e),
                }
            }
        }
    }

    fn no_content(&self) -> Synthesis {
        Synthesis {
            summary: "Aucun contenu n'a pu être analysé pour cette recherche.".to_string(),
            key_points: Vec::new(),
            recommendations: Vec::new(),
            confidence: self.config.no_content_confidence.clamp(0.0, 1.0),
            sources_summary: "Aucune source accessible".to_string(),
        }
    }

    fn build_prompt(&self, query: &str, pages: &[&ScrapedPage]) -> String {
        let mut sources = String::new();
        for page in pages {
            let excerpt: String = page.content.chars().take(self.config.excerpt_chars).collect();
            sources.push_str(&format!(
                "\n--- Source: {} ({}) ---\n{}\n",
                page.title, page.url, excerpt
            ));
        }

        format!(
            r#"Analyse the following scraped web content and write a synthesis for the query: "{query}"

Web source content:
{sources}

Produce a JSON synthesis with:
1. A clear, informative summary
2. 3-5 key points taken from the content
3. 2-3 practical recommendations
4. A confidence score between 0.0 and 1.0

Expected format (JSON only):
{{
    "summary": "Detailed summary based on the analysed sources",
    "key_points": [
        "Key point 1",
        "Key point 2",
        "Key point 3"
    ],
    "recommendations": [
        "Recommendation 1",
        "Recommendation 2"
    ],
    "confidence": 0.8
}}

Write in the language of the query. Reply with the JSON only, without any additional text."#
        )
    }

    /// Template-based synthesis built from the page text alone
    fn heuristic(&self, query: &str, pages: &[&ScrapedPage]) -> Synthesis {
        let n = pages.len();
        let content = pages
            .iter()
            .map(|p| p.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let mut summary = format!(
            "Basé sur l'analyse de {} sources, voici ce que j'ai trouvé sur '{}': ",
            n, query
        );
        match relevant_sentence(query, &content) {
            Some(sentence) => {
                summary.extend(sentence.chars().take(SUMMARY_SENTENCE_CHARS));
                summary.push_str("...");
            }
            None => summary
                .push_str("Les sources consultées offrent différentes perspectives sur le sujet."),
        }

        let mut key_points = vec![format!("Informations collectées depuis {} sources web", n)];
        key_points.extend(category_points(query, &content));
        key_points.push("Contenu analysé automatiquement".to_string());
        key_points.push("Résultats basés sur le scraping en temps réel".to_string());
        key_points.truncate(MAX_KEY_POINTS);

        let mut recommendations = category_recommendations(query, &content);
        recommendations.push("Consultez les sources originales pour plus de détails".to_string());
        recommendations.push("Vérifiez les informations sur plusieurs sites".to_string());
        recommendations.truncate(MAX_RECOMMENDATIONS);

        let confidence = (self.config.confidence_base + self.config.confidence_per_page * n as f32)
            .min(self.config.confidence_cap)
            .clamp(0.0, 1.0);

        Synthesis {
            summary,
            key_points,
            recommendations,
            confidence,
            sources_summary: sources_summary(n),
        }
    }
}

fn sources_summary(n: usize) -> String {
    format!("{} sources analysées avec succès", n)
}

/// First of the leading ten substantial sentences that mentions a query word
fn relevant_sentence<'a>(query: &str, content: &'a str) -> Option<&'a str> {
    let words: Vec<String> = query
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .map(str::to_lowercase)
        .collect();

    content
        .split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() > 20)
        .take(10)
        .find(|s| {
            let lower = s.to_lowercase();
            words.iter().any(|w| lower.contains(w.as_str()))
        })
}

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+[,.]?\d*\s*(€|euros?)").expect("price pattern is valid")
});

fn mentions_price(content: &str) -> bool {
    PRICE.is_match(content)
}

fn category_points(query: &str, content: &str) -> Vec<String> {
    let query = query.to_lowercase();
    let lower = content.to_lowercase();
    let mut points = Vec::new();

    if query.contains("meilleur") {
        if lower.contains("amazon") {
            points.push("Produits disponibles sur Amazon avec avis clients");
        }
        if lower.contains("prix") || content.contains('€') || content.contains('$') {
            points.push("Informations de prix trouvées");
        }
        if lower.contains("avis") || lower.contains("test") {
            points.push("Tests et avis d'utilisateurs disponibles");
        }
    } else if query.contains("prix") {
        if mentions_price(content) {
            points.push("Informations de tarification détaillées trouvées");
        }
    } else if query.contains("comment") {
        if ["étape", "step", "guide", "tutoriel"].iter().any(|w| lower.contains(w)) {
            points.push("Guide étape par étape disponible");
        }
        if ["exemple", "démo"].iter().any(|w| lower.contains(w)) {
            points.push("Exemples pratiques fournis");
        }
    }

    points.into_iter().map(str::to_string).collect()
}

fn category_recommendations(query: &str, content: &str) -> Vec<String> {
    let query = query.to_lowercase();
    let mut recommendations = Vec::new();

    if query.contains("meilleur") {
        recommendations.push("Comparez les avis utilisateurs avant votre choix");
        recommendations.push("Vérifiez les prix sur plusieurs sites");
    }
    if query.contains("prix") {
        recommendations.push("Surveillez les promotions et offres spéciales");
    }
    if content.to_lowercase().contains("amazon") {
        recommendations.push("Consultez Amazon pour plus d'options et d'avis");
    }

    recommendations.into_iter().map(str::to_string).collect()
}

// ============= Lenient wire format =============

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSynthesis {
    summary: Option<String>,
    key_points: Option<Vec<String>>,
    recommendations: Option<Vec<String>>,
    confidence: Option<f32>,
}

impl RawSynthesis {
    fn into_synthesis(self, query: &str, n: usize) -> Synthesis {
        let mut key_points = self.key_points.unwrap_or_default();
        key_points.retain(|p| !p.trim().is_empty());
        if key_points.is_empty() {
            key_points.push("Informations trouvées dans les sources analysées".to_string());
        }
        key_points.truncate(MAX_KEY_POINTS);

        let mut recommendations = self.recommendations.unwrap_or_default();
        recommendations.retain(|r| !r.trim().is_empty());
        if recommendations.is_empty() {
            recommendations.push("Consultez les sources pour plus de détails".to_string());
        }
        recommendations.truncate(MAX_RECOMMENDATIONS);

        let confidence = self
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(DEFAULT_MODEL_CONFIDENCE)
            .clamp(0.0, 1.0);

        Synthesis {
            summary: self
                .summary
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| format!("Analyse de {} sources sur '{}'", n, query)),
            key_points,
            recommendations,
            confidence,
            sources_summary: sources_summary(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppError, Result, ScrapeStatus, SearchResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedLLM {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedLLM {
        fn replying(reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedLLM {
        async fn complete(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| AppError::Completion("connection refused".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn page(content: &str, status: ScrapeStatus) -> ScrapedPage {
        ScrapedPage {
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            content: content.to_string(),
            word_count: content.split_whitespace().count(),
            status,
            search_result: SearchResult {
                title: "Example".to_string(),
                url: "https://example.com".to_string(),
                snippet: String::new(),
                source: "example.com".to_string(),
                relevance_score: 1.0,
                target_type: None,
            },
        }
    }

    fn synthesizer(llm: Arc<ScriptedLLM>) -> Synthesizer {
        Synthesizer::new(llm, GenerationParams::new(0.4, 800), SynthesisConfig::default())
    }

    #[tokio::test]
    async fn test_no_pages_skips_llm() {
        let llm = ScriptedLLM::replying("{}");
        let outcome = synthesizer(llm.clone()).synthesize("q", &[]).await;

        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.reason(), Some(&FallbackReason::NoContent));
        let synthesis = outcome.value();
        assert!(synthesis.confidence <= 0.2);
        assert!(synthesis.key_points.is_empty());
    }

    #[tokio::test]
    async fn test_only_failed_pages_counts_as_no_content() {
        let llm = ScriptedLLM::replying("{}");
        let pages = vec![page("timed out", ScrapeStatus::Timeout)];
        let outcome = synthesizer(llm.clone()).synthesize("q", &pages).await;
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.reason(), Some(&FallbackReason::NoContent));
    }

    #[tokio::test]
    async fn test_model_synthesis_is_normalised() {
        let llm = ScriptedLLM::replying(
            "```json\n{\"summary\": \"Résumé\", \"key_points\": [\"a\",\"b\",\"c\",\"d\",\"e\",\"f\"], \"confidence\": 1.7}\n```",
        );
        let pages = vec![page("Du contenu utile.", ScrapeStatus::Success)];
        let outcome = synthesizer(llm).synthesize("q", &pages).await;

        assert!(!outcome.is_fallback());
        let synthesis = outcome.value();
        assert_eq!(synthesis.summary, "Résumé");
        assert_eq!(synthesis.key_points.len(), 5);
        assert_eq!(
            synthesis.recommendations,
            vec!["Consultez les sources pour plus de détails"]
        );
        assert_eq!(synthesis.confidence, 1.0);
        assert_eq!(synthesis.sources_summary, "1 sources analysées avec succès");
    }

    #[tokio::test]
    async fn test_failing_llm_uses_heuristic() {
        let content = "Le prix moyen du mètre carré à Paris atteint 9 800 € en 2025. Court.";
        let pages = vec![
            page(content, ScrapeStatus::Success),
            page(content, ScrapeStatus::Success),
        ];
        let outcome = synthesizer(ScriptedLLM::failing())
            .synthesize("prix immobilier Paris", &pages)
            .await;

        assert!(matches!(
            outcome.reason(),
            Some(FallbackReason::UpstreamUnavailable { .. })
        ));
        let synthesis = outcome.value();
        assert!(synthesis.summary.contains("Le prix moyen du mètre carré"));
        assert!(synthesis.summary.ends_with("..."));
        assert!((synthesis.confidence - 0.5).abs() < 1e-6);
        assert!(synthesis
            .key_points
            .contains(&"Informations de tarification détaillées trouvées".to_string()));
        assert_eq!(
            synthesis.recommendations[0],
            "Surveillez les promotions et offres spéciales"
        );
        assert!(synthesis.key_points.len() <= 5);
        assert!(synthesis.recommendations.len() <= 3);
    }

    #[tokio::test]
    async fn test_malformed_reply_uses_heuristic() {
        let pages = vec![page("Rien de pertinent ici pour la requête.", ScrapeStatus::Success)];
        let outcome = synthesizer(ScriptedLLM::replying("I cannot help with that"))
            .synthesize("velo", &pages)
            .await;

        assert!(matches!(
            outcome.reason(),
            Some(FallbackReason::MalformedUpstreamResponse { .. })
        ));
        assert!(outcome
            .value()
            .summary
            .ends_with("Les sources consultées offrent différentes perspectives sur le sujet."));
    }

    #[test]
    fn test_heuristic_confidence_is_capped() {
        let synth = synthesizer(ScriptedLLM::failing());
        let pages: Vec<ScrapedPage> = (0..6)
            .map(|_| page("Contenu", ScrapeStatus::Success))
            .collect();
        let refs: Vec<&ScrapedPage> = pages.iter().collect();
        let synthesis = synth.heuristic("q", &refs);
        assert!((synthesis.confidence - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_comparison_templates() {
        let content = "Notre test complet sur Amazon, à partir de 99 €";
        let points = category_points("meilleur casque", content);
        assert_eq!(points.len(), 3);
        let recs = category_recommendations("meilleur casque", content);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[2], "Consultez Amazon pour plus d'options et d'avis");
    }

    #[test]
    fn test_price_pattern() {
        assert!(mentions_price("à partir de 1 299,99 euros"));
        assert!(mentions_price("12.5€"));
        assert!(!mentions_price("aucun tarif communiqué"));
    }
}
