//! Wide event payloads summarizing a crawl in one record.

use serde_json::{json, Value};

use crate::core::CrawlReport;

/// Builds the payload of the `crawl.stopped` event.
#[must_use]
pub fn build_stop_payload(report: &CrawlReport) -> Value {
    let c = &report.counters;
    json!({
        "run_id": report.run_id.to_string(),
        "source": report.source,
        "stop_reason": report.stop_reason.to_string(),
        "restriction_boundary": report.stop_reason.is_restriction_boundary(),
        "pages_visited": c.pages_visited,
        "candidates_seen": c.candidates_seen,
        "emitted": c.emitted,
        "skipped_known": c.skipped_known,
        "skipped_after_to_date": c.skipped_after_to_date,
        "skipped_undated": c.skipped_undated,
        "error": report.error,
        "started_at": report.started_at.to_rfc3339(),
        "ended_at": report.ended_at.to_rfc3339(),
        "duration_ms": report.duration_ms(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CrawlCounters, StopReason};
    use chrono::Utc;

    #[test]
    fn test_stop_payload() {
        let now = Utc::now();
        let report = CrawlReport {
            run_id: uuid::Uuid::now_v7(),
            source: "emvco".to_string(),
            stop_reason: StopReason::DateExceeded,
            counters: CrawlCounters {
                pages_visited: 2,
                emitted: 5,
                ..CrawlCounters::default()
            },
            error: None,
            started_at: now,
            ended_at: now,
        };

        let payload = build_stop_payload(&report);
        assert_eq!(payload["stop_reason"], "date_exceeded");
        assert_eq!(payload["restriction_boundary"], true);
        assert_eq!(payload["emitted"], 5);
        assert!(payload["error"].is_null());
    }
}
