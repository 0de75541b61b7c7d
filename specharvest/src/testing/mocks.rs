//! Scripted collaborators for driving the walker in tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;

use crate::config::PaginationSelectors;
use crate::core::SpecDocument;
use crate::crawl::{DocumentSink, IdentityIndex, PageSource};
use crate::errors::CrawlError;
use crate::navigation::PaginationInspector;

#[derive(Debug, Default)]
struct ScriptState {
    current: usize,
    opened_urls: Vec<String>,
    triggers: usize,
}

/// A page source that serves a fixed sequence of HTML pages.
///
/// `has_next_page` inspects the served HTML with the default EMVCo
/// pagination selectors, so the pages themselves decide where the listing
/// ends. Triggering past the last page is a navigation error.
#[derive(Debug)]
pub struct ScriptedPageSource {
    pages: Vec<String>,
    inspector: Option<PaginationInspector>,
    state: Mutex<ScriptState>,
    fail_open: bool,
    fail_trigger_on: HashSet<usize>,
    fail_lookup: bool,
    stuck: bool,
}

impl ScriptedPageSource {
    /// Serves `pages` in order.
    #[must_use]
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            inspector: PaginationInspector::new(PaginationSelectors::default()).ok(),
            state: Mutex::new(ScriptState::default()),
            fail_open: false,
            fail_trigger_on: HashSet::new(),
            fail_lookup: false,
            stuck: false,
        }
    }

    /// Makes `open` fail.
    #[must_use]
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Makes `trigger_next_page` fail while on the given 1-based page.
    #[must_use]
    pub fn failing_trigger_on(mut self, page: usize) -> Self {
        self.fail_trigger_on.insert(page);
        self
    }

    /// Makes `has_next_page` fail.
    #[must_use]
    pub fn failing_lookup(mut self) -> Self {
        self.fail_lookup = true;
        self
    }

    /// Makes `trigger_next_page` succeed without moving.
    #[must_use]
    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }

    /// URLs passed to `open`.
    #[must_use]
    pub fn opened_urls(&self) -> Vec<String> {
        self.state.lock().opened_urls.clone()
    }

    /// Number of successful `trigger_next_page` calls.
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.state.lock().triggers
    }

    /// 1-based page the source is positioned on.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.state.lock().current + 1
    }

    fn page(&self, index: usize) -> Result<String, CrawlError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| CrawlError::navigation(format!("no scripted page {}", index + 1)))
    }
}

#[async_trait]
impl PageSource for ScriptedPageSource {
    async fn open(&self, url: &str) -> Result<String, CrawlError> {
        self.state.lock().opened_urls.push(url.to_string());
        if self.fail_open {
            return Err(CrawlError::fetch(url, "scripted open failure"));
        }
        self.state.lock().current = 0;
        self.page(0)
    }

    async fn current_content(&self) -> Result<String, CrawlError> {
        let current = self.state.lock().current;
        self.page(current)
    }

    async fn has_next_page(&self, content: &str) -> Result<bool, CrawlError> {
        if self.fail_lookup {
            return Err(CrawlError::PaginationControl("scripted lookup failure".to_string()));
        }
        let inspector = self
            .inspector
            .as_ref()
            .ok_or_else(|| CrawlError::PaginationControl("no inspector".to_string()))?;
        Ok(inspector.inspect(content).is_enabled())
    }

    async fn trigger_next_page(&self) -> Result<(), CrawlError> {
        let mut state = self.state.lock();
        let page = state.current + 1;
        if self.fail_trigger_on.contains(&page) {
            return Err(CrawlError::navigation(format!("scripted click failure on page {page}")));
        }
        if !self.stuck {
            if page >= self.pages.len() {
                return Err(CrawlError::navigation(format!("no scripted page after {page}")));
            }
            state.current += 1;
        }
        state.triggers += 1;
        Ok(())
    }

    async fn page_label(&self) -> Option<String> {
        let current = self.state.lock().current;
        let html = self.pages.get(current)?;
        self.inspector.as_ref()?.page_label(html)
    }
}

/// An identity index that always errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingIndex;

#[async_trait]
impl IdentityIndex for FailingIndex {
    async fn is_known(&self, identity: &str) -> Result<bool, CrawlError> {
        Err(CrawlError::Index(format!("index unavailable for {identity}")))
    }
}

/// A sink that accepts `limit` documents and rejects the rest.
#[derive(Debug, Default)]
pub struct FailingSink {
    limit: usize,
    accepted: Mutex<Vec<String>>,
}

impl FailingSink {
    /// Accepts `limit` documents before failing.
    #[must_use]
    pub fn after(limit: usize) -> Self {
        Self {
            limit,
            accepted: Mutex::new(Vec::new()),
        }
    }

    /// Links accepted before failing.
    #[must_use]
    pub fn accepted(&self) -> Vec<String> {
        self.accepted.lock().clone()
    }
}

#[async_trait]
impl DocumentSink for FailingSink {
    async fn emit(&self, document: SpecDocument) -> Result<(), CrawlError> {
        let mut accepted = self.accepted.lock();
        if accepted.len() >= self.limit {
            return Err(CrawlError::Sink(format!("rejected {}", document.link)));
        }
        accepted.push(document.link);
        Ok(())
    }
}
