//! Per-session counters
//!
//! The HTTP server keeps one [`SessionStats`] behind a lock in its state and
//! records every completed run, exposed at `GET /api/session`. Library callers
//! driving several runs can keep their own and call [`SessionStats::record`].

use crate::types::{Intent, ResearchBundle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Completed research runs
    pub searches: usize,
    /// Successfully scraped pages across all runs
    pub pages_scraped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<RunSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: Uuid,
    pub query: String,
    pub intent: Intent,
    pub successful_pages: usize,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

impl SessionStats {
    pub fn record(&mut self, bundle: &ResearchBundle) {
        let successful_pages = bundle.successful_pages();
        self.searches += 1;
        self.pages_scraped += successful_pages;
        self.last_run = Some(RunSummary {
            id: bundle.id,
            query: bundle.query.clone(),
            intent: bundle.plan.analysis.intent,
            successful_pages,
            confidence: bundle.synthesis.confidence,
            timestamp: bundle.timestamp,
        });
    }
}
