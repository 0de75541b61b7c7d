//! Walker-owned position within the listing.

use crate::core::StopReason;

/// Tracks the page being processed and the fingerprint of the last one.
#[derive(Debug, Clone)]
pub struct PageCursor {
    page: usize,
    pages_processed: usize,
    last_fingerprint: Option<String>,
    stopped: Option<StopReason>,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    /// A cursor positioned on page 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            page: 1,
            pages_processed: 0,
            last_fingerprint: None,
            stopped: None,
        }
    }

    /// 1-based index of the current page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Whether the cursor is on the first page.
    #[must_use]
    pub fn is_first_page(&self) -> bool {
        self.page == 1
    }

    /// Pages whose rows were processed.
    #[must_use]
    pub fn pages_processed(&self) -> usize {
        self.pages_processed
    }

    /// Records that the current page was loaded with the given fingerprint.
    ///
    /// Returns false if the fingerprint equals the previous page's, meaning
    /// navigation did not move.
    pub fn enter_page(&mut self, fingerprint: String) -> bool {
        if self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return false;
        }
        self.last_fingerprint = Some(fingerprint);
        true
    }

    /// Marks the current page as processed.
    pub fn finish_page(&mut self) {
        self.pages_processed += 1;
    }

    /// Moves to the next page.
    pub fn advance(&mut self) {
        self.page += 1;
    }

    /// Whether `max_pages` processed pages exhaust the page cap.
    #[must_use]
    pub fn at_page_limit(&self, max_pages: Option<usize>) -> bool {
        max_pages.is_some_and(|max| self.pages_processed >= max)
    }

    /// Marks the cursor terminal.
    pub fn stop(&mut self, reason: StopReason) {
        self.stopped.get_or_insert(reason);
    }

    /// Terminal reason, once stopped.
    #[must_use]
    pub fn stopped(&self) -> Option<StopReason> {
        self.stopped
    }
}
