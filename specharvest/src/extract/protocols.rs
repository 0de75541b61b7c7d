//! Protocol trait for listing extraction.

use crate::config::ListingSelectors;
use crate::core::CandidateRecord;

/// Turns the HTML of one listing page into candidate records.
///
/// Implementations keep no state between calls. Rows that lack a required
/// field are dropped; the remaining rows are returned in document order.
pub trait ListingExtractor: Send + Sync {
    /// Extracts the candidates of one page. A page without the listing
    /// container yields an empty vector.
    fn extract(&self, html: &str) -> Vec<CandidateRecord>;

    /// Gets the selectors this extractor was built from.
    fn config(&self) -> &ListingSelectors;
}
