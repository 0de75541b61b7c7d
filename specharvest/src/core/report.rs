//! Crawl summary returned to the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::status::{SkipReason, StopReason};

/// Running counters kept by the walker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlCounters {
    /// Pages whose rows were processed.
    pub pages_visited: usize,
    /// Candidates produced by the extractor.
    pub candidates_seen: usize,
    /// Candidates handed to the sink.
    pub emitted: usize,
    /// Candidates skipped because they were already known.
    pub skipped_known: usize,
    /// Candidates skipped for being newer than `to_date`.
    pub skipped_after_to_date: usize,
    /// Undated candidates dropped by policy.
    pub skipped_undated: usize,
}

impl CrawlCounters {
    /// Records a skipped candidate.
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Known => self.skipped_known += 1,
            SkipReason::AfterToDate => self.skipped_after_to_date += 1,
            SkipReason::Undated => self.skipped_undated += 1,
        }
    }

    /// Total skipped candidates.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped_known + self.skipped_after_to_date + self.skipped_undated
    }
}

/// Outcome of a finished crawl.
///
/// Produced for every clean stop, including `NavigationError`; failures
/// the crawler cannot classify are returned as errors instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Run identifier.
    pub run_id: Uuid,
    /// Source reference.
    pub source: String,
    /// Why the crawl stopped.
    pub stop_reason: StopReason,
    /// Counters at the time of the stop.
    pub counters: CrawlCounters,
    /// Error message for `NavigationError` stops.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the crawl started.
    pub started_at: DateTime<Utc>,
    /// When the crawl stopped.
    pub ended_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Returns the duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds() as f64
    }

    /// Number of emitted documents.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.counters.emitted
    }

    /// Returns true if the crawl reached already-processed history.
    #[must_use]
    pub fn reached_restriction_boundary(&self) -> bool {
        self.stop_reason.is_restriction_boundary()
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut dict = HashMap::new();
        dict.insert("run_id".to_string(), serde_json::json!(self.run_id.to_string()));
        dict.insert("source".to_string(), serde_json::json!(self.source));
        dict.insert("stop_reason".to_string(), serde_json::json!(self.stop_reason.to_string()));
        dict.insert("pages_visited".to_string(), serde_json::json!(self.counters.pages_visited));
        dict.insert("emitted".to_string(), serde_json::json!(self.counters.emitted));
        dict.insert("skipped".to_string(), serde_json::json!(self.counters.skipped()));
        dict.insert("duration_ms".to_string(), serde_json::json!(self.duration_ms()));
        if let Some(ref error) = self.error {
            dict.insert("error".to_string(), serde_json::json!(error));
        }
        dict
    }
}
