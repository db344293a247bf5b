//! Result filtering against the plan's target sites
//!
//! A result is kept when it comes from a target domain (or any target is
//! `general`), or when its title and snippet mention words typical of a
//! targeted content type. Order is preserved and nothing is re-ranked.

use crate::types::{ContentType, SearchResult, TargetSite};

const PRODUCT_TERMS: &[&str] = &["test", "avis", "comparaison", "meilleur"];
const NEWS_TERMS: &[&str] = &["actualité", "nouveau"];
const TUTORIAL_TERMS: &[&str] = &["guide", "comment", "tutoriel", "apprendre"];

#[derive(Debug, Clone)]
pub struct ResultFilter {
    max_results: usize,
    /// Recency year and the year before, as news markers
    year_tokens: [String; 2],
}

impl ResultFilter {
    pub fn new(max_results: usize, recency_year: i32) -> Self {
        Self {
            max_results,
            year_tokens: [recency_year.to_string(), (recency_year - 1).to_string()],
        }
    }

    /// Keep relevant results in their original order, at most `max_results`
    pub fn filter_results(
        &self,
        results: Vec<SearchResult>,
        targets: &[TargetSite],
    ) -> Vec<SearchResult> {
        results
            .into_iter()
            .filter_map(|mut result| {
                let site_match = targets.iter().find(|t| matches_site(t, &result.source));
                if let Some(target) = site_match {
                    result.target_type = Some(target.search_type);
                }

                if site_match.is_some() || self.matches_content(&result, targets) {
                    Some(result)
                } else {
                    None
                }
            })
            .take(self.max_results)
            .collect()
    }

    fn matches_content(&self, result: &SearchResult, targets: &[TargetSite]) -> bool {
        let text = format!("{} {}", result.title, result.snippet).to_lowercase();
        let mentions = |terms: &[&str]| terms.iter().any(|term| text.contains(term));

        targets.iter().any(|target| match target.search_type {
            ContentType::Product => mentions(PRODUCT_TERMS),
            ContentType::News => {
                mentions(NEWS_TERMS) || self.year_tokens.iter().any(|y| text.contains(y.as_str()))
            }
            ContentType::Tutorial => mentions(TUTORIAL_TERMS),
            _ => false,
        })
    }
}

fn matches_site(target: &TargetSite, source_domain: &str) -> bool {
    target.is_general() || (!target.url.is_empty() && source_domain.contains(&target.url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, source: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: format!("https://{}/page", source),
            snippet: String::new(),
            source: source.to_string(),
            relevance_score: 1.0,
            target_type: None,
        }
    }

    fn shopping_targets() -> Vec<TargetSite> {
        vec![
            TargetSite::new("Amazon", "amazon.fr", ContentType::Product),
            TargetSite::new("Cdiscount", "cdiscount.com", ContentType::Product),
        ]
    }

    #[test]
    fn test_empty_input() {
        let filter = ResultFilter::new(8, 2025);
        assert!(filter.filter_results(vec![], &shopping_targets()).is_empty());
    }

    #[test]
    fn test_domain_match_records_target_type() {
        let filter = ResultFilter::new(8, 2025);
        let kept = filter.filter_results(
            vec![result("Casque X", "amazon.fr"), result("Recette", "marmiton.org")],
            &shopping_targets(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source, "amazon.fr");
        assert_eq!(kept[0].target_type, Some(ContentType::Product));
    }

    #[test]
    fn test_content_keywords_keep_off_domain_results() {
        let filter = ResultFilter::new(8, 2025);
        let kept = filter.filter_results(
            vec![result("Meilleur casque moto : notre test", "lerepairedesmotards.com")],
            &shopping_targets(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].target_type, None);
    }

    #[test]
    fn test_news_year_tokens() {
        let filter = ResultFilter::new(8, 2025);
        let targets = vec![TargetSite::new("Le Monde", "lemonde.fr", ContentType::News)];
        let kept = filter.filter_results(
            vec![
                result("Bilan 2024 du marché", "example.com"),
                result("Bilan 2019 du marché", "example.com"),
            ],
            &targets,
        );
        assert_eq!(kept.len(), 1);
        assert!(kept[0].title.contains("2024"));
    }

    #[test]
    fn test_general_target_keeps_everything_capped() {
        let filter = ResultFilter::new(8, 2025);
        let targets = vec![TargetSite::general("Sites", ContentType::General)];
        let input: Vec<SearchResult> = (0..12)
            .map(|i| result(&format!("Result {}", i), &format!("site{}.fr", i)))
            .collect();
        let kept = filter.filter_results(input, &targets);

        assert_eq!(kept.len(), 8);
        assert_eq!(kept[0].title, "Result 0");
        assert_eq!(kept[7].title, "Result 7");
        assert!(kept.iter().all(|r| r.target_type == Some(ContentType::General)));
    }

    #[test]
    fn test_empty_domain_token_never_matches() {
        let filter = ResultFilter::new(8, 2025);
        let targets = vec![TargetSite::new("Blank", "", ContentType::Blog)];
        assert!(filter
            .filter_results(vec![result("Anything", "example.com")], &targets)
            .is_empty());
    }
}
