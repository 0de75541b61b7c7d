//! Assertions over crawl reports and emitted documents.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::core::{CrawlReport, SpecDocument, StopReason};

/// Asserts the crawl stopped for the expected reason.
pub fn assert_stopped_with(report: &CrawlReport, expected: StopReason) {
    assert_eq!(
        report.stop_reason, expected,
        "Expected stop reason {expected}, got {} (error: {:?})",
        report.stop_reason, report.error
    );
}

/// Asserts the documents carry exactly these links, in order.
pub fn assert_emitted_links(documents: &[SpecDocument], expected: &[&str]) {
    let actual: Vec<&str> = documents.iter().map(|d| d.link.as_str()).collect();
    assert_eq!(actual, expected, "Emitted links differ");
}

/// Asserts no dated document is older than `floor`.
pub fn assert_none_before(documents: &[SpecDocument], floor: DateTime<Utc>) {
    for doc in documents {
        if let Some(published) = doc.published {
            assert!(
                published >= floor,
                "Document {} published {published} is before {floor}",
                doc.link
            );
        }
    }
}

/// Asserts no link was emitted twice.
pub fn assert_unique_links(documents: &[SpecDocument]) {
    let mut seen = HashSet::new();
    for doc in documents {
        assert!(seen.insert(doc.link.as_str()), "Document {} emitted twice", doc.link);
    }
}
