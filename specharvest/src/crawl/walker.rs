//! The pagination walker: an explicit state machine over listing pages.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::cursor::PageCursor;
use super::protocols::{DocumentSink, IdentityIndex, PageSource};
use super::restrictions::{RestrictionFilter, Verdict};
use crate::config::CrawlConfig;
use crate::core::{
    CandidateRecord, CrawlCounters, CrawlReport, SpecDocument, StopReason, WalkerState,
};
use crate::errors::CrawlError;
use crate::events::{names, EventSink, NoOpEventSink};
use crate::extract::{HtmlListingExtractor, ListingExtractor};
use crate::observability::{build_stop_payload, CrawlSpanAttributes, SpanTimer};
use crate::utils::{generate_run_id, now_utc, page_fingerprint};

/// Mutable state of one run. Owned by `run` and never shared.
struct RunState {
    cursor: PageCursor,
    counters: CrawlCounters,
    content: String,
    error: Option<String>,
}

/// Walks a paginated listing, filtering and emitting candidates page by
/// page until a restriction or the end of the listing stops it.
///
/// `run` returns `Ok(report)` for every orderly stop, including a failed
/// fetch or navigation (`StopReason::NavigationError`). Only failures of
/// the identity index or the document sink come back as `Err`.
pub struct PaginationWalker {
    config: CrawlConfig,
    source: Arc<dyn PageSource>,
    index: Arc<dyn IdentityIndex>,
    sink: Arc<dyn DocumentSink>,
    extractor: Arc<dyn ListingExtractor>,
    filter: RestrictionFilter,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for PaginationWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationWalker")
            .field("source", &self.config.source)
            .field("start_url", &self.config.start_url)
            .field("restrictions", self.filter.config())
            .finish_non_exhaustive()
    }
}

impl PaginationWalker {
    /// Creates a walker with an HTML extractor built from the configured
    /// listing selectors.
    pub fn new(
        config: CrawlConfig,
        source: Arc<dyn PageSource>,
        index: Arc<dyn IdentityIndex>,
        sink: Arc<dyn DocumentSink>,
    ) -> Result<Self, CrawlError> {
        config.validate()?;
        let extractor = Arc::new(HtmlListingExtractor::new(config.listing.clone())?);
        let filter = RestrictionFilter::new(&config.restrictions);
        Ok(Self {
            config,
            source,
            index,
            sink,
            extractor,
            filter,
            events: Arc::new(NoOpEventSink),
        })
    }

    /// Replaces the extractor.
    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn ListingExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs the crawl to a stop.
    pub async fn run(&self) -> Result<CrawlReport, CrawlError> {
        let run_id = generate_run_id();
        let span = info_span!("crawl", run_id = %run_id, source = %self.config.source);
        self.run_with_id(run_id).instrument(span).await
    }

    async fn run_with_id(&self, run_id: Uuid) -> Result<CrawlReport, CrawlError> {
        let started_at = now_utc();
        let restrictions = self.filter.config();
        info!(
            start_url = %self.config.start_url,
            from_date = ?restrictions.from_date,
            max_items = ?restrictions.max_items,
            to_last_seen = restrictions.to_last_seen,
            "Crawl started"
        );
        self.events
            .emit(
                names::CRAWL_STARTED,
                Some(json!(CrawlSpanAttributes::new()
                    .with_run_id(run_id.to_string())
                    .with_source(self.config.source.as_str())
                    .with_start_url(self.config.start_url.as_str()))),
            )
            .await;

        let mut run = RunState {
            cursor: PageCursor::new(),
            counters: CrawlCounters::default(),
            content: String::new(),
            error: None,
        };

        let stop_reason = match self.drive(&mut run).await {
            Ok(reason) => reason,
            Err(err) => {
                error!(
                    page = run.cursor.page(),
                    emitted = run.counters.emitted,
                    error_kind = err.kind(),
                    "Crawl failed: {err}"
                );
                self.events
                    .emit(
                        names::CRAWL_FAILED,
                        Some(json!({
                            "run_id": run_id.to_string(),
                            "page": run.cursor.page(),
                            "error": err.to_dict(),
                        })),
                    )
                    .await;
                return Err(err);
            }
        };

        let report = CrawlReport {
            run_id,
            source: self.config.source.clone(),
            stop_reason,
            counters: run.counters,
            error: run.error,
            started_at,
            ended_at: now_utc(),
        };
        info!(
            stop_reason = %report.stop_reason,
            pages = report.counters.pages_visited,
            emitted = report.counters.emitted,
            skipped = report.counters.skipped(),
            duration_ms = report.duration_ms(),
            "Crawl stopped"
        );
        self.events
            .emit(names::CRAWL_STOPPED, Some(build_stop_payload(&report)))
            .await;
        Ok(report)
    }

    /// Steps the state machine until it reaches `Stopped`.
    async fn drive(&self, run: &mut RunState) -> Result<StopReason, CrawlError> {
        let mut state = WalkerState::FetchingPage;
        loop {
            debug!(state = %state, page = run.cursor.page(), "Walker step");
            state = match state {
                WalkerState::FetchingPage => self.fetch_page(run).await,
                WalkerState::ProcessingRows => self.process_rows(run).await?,
                WalkerState::AdvancingPage => self.advance(run).await,
                WalkerState::Stopped(reason) => {
                    run.cursor.stop(reason);
                    return Ok(reason);
                }
            };
        }
    }

    async fn fetch_page(&self, run: &mut RunState) -> WalkerState {
        let page = run.cursor.page();
        let timer = SpanTimer::start("fetch_page");
        let fetched = if run.cursor.is_first_page() {
            match self.source.open(&self.config.start_url).await {
                Ok(content) => {
                    tokio::time::sleep(self.config.initial_delay()).await;
                    Ok(content)
                }
                Err(err) => Err(err),
            }
        } else {
            self.source.current_content().await
        };

        let content = match fetched {
            Ok(content) => content,
            Err(err) => {
                warn!(page, error_kind = err.kind(), "Could not load listing page: {err}");
                run.error = Some(err.to_string());
                return WalkerState::Stopped(StopReason::NavigationError);
            }
        };

        if !run.cursor.enter_page(page_fingerprint(&content)) {
            info!(page, "Navigation left the listing unchanged, treating as last page");
            return WalkerState::Stopped(StopReason::EndOfPagination);
        }

        let label = self.source.page_label().await;
        debug!(
            page,
            label = label.as_deref().unwrap_or("-"),
            bytes = content.len(),
            duration_ms = timer.finish(),
            "Listing page loaded"
        );
        run.content = content;
        WalkerState::ProcessingRows
    }

    async fn process_rows(&self, run: &mut RunState) -> Result<WalkerState, CrawlError> {
        let page = run.cursor.page();
        let candidates = self.extractor.extract(&run.content);
        run.cursor.finish_page();
        run.counters.pages_visited += 1;

        info!(page, candidates = candidates.len(), "Processing listing page");
        if candidates.is_empty() {
            warn!(page, "No listing rows found on page");
        }
        self.events
            .emit(
                names::PAGE_LOADED,
                Some(json!({"page": page, "candidates": candidates.len()})),
            )
            .await;

        for candidate in candidates {
            run.counters.candidates_seen += 1;
            let known = self.index.is_known(candidate.identity()).await?;

            match self.filter.evaluate(&candidate, known, run.counters.emitted) {
                Verdict::Accept => {
                    self.emit(&candidate, page).await?;
                    run.counters.emitted += 1;
                    if self.filter.cap_reached(run.counters.emitted) {
                        info!(page, emitted = run.counters.emitted, "Item cap reached");
                        return Ok(WalkerState::Stopped(StopReason::MaxReached));
                    }
                }
                Verdict::Skip(reason) => {
                    run.counters.record_skip(reason);
                    debug!(page, link = %candidate.link, reason = %reason, "Candidate skipped");
                    self.events
                        .emit(
                            names::CANDIDATE_SKIPPED,
                            Some(json!({
                                "page": page,
                                "link": candidate.link,
                                "reason": reason.to_string(),
                            })),
                        )
                        .await;
                }
                Verdict::Stop(reason) => {
                    info!(
                        page,
                        link = %candidate.link,
                        published = ?candidate.published,
                        reason = %reason,
                        "Restriction boundary reached"
                    );
                    return Ok(WalkerState::Stopped(reason));
                }
            }
        }

        Ok(WalkerState::AdvancingPage)
    }

    async fn emit(&self, candidate: &CandidateRecord, page: usize) -> Result<(), CrawlError> {
        let document = SpecDocument::from_candidate(candidate, self.config.source.as_str());
        self.sink.emit(document).await?;
        debug!(page, link = %candidate.link, title = %candidate.title, "Candidate emitted");
        self.events
            .emit(
                names::CANDIDATE_EMITTED,
                Some(json!({
                    "page": page,
                    "link": candidate.link,
                    "title": candidate.title,
                    "published": candidate.published.map(|p| p.to_rfc3339()),
                })),
            )
            .await;
        Ok(())
    }

    async fn advance(&self, run: &mut RunState) -> WalkerState {
        let page = run.cursor.page();

        let has_next = match self.source.has_next_page(&run.content).await {
            Ok(has_next) => has_next,
            Err(err) => {
                warn!(page, "Pagination control lookup failed, treating as last page: {err}");
                false
            }
        };
        if !has_next {
            info!(page, "No next page");
            return WalkerState::Stopped(StopReason::EndOfPagination);
        }

        if run.cursor.at_page_limit(self.config.max_pages) {
            warn!(page, max_pages = ?self.config.max_pages, "Page cap reached with pages remaining");
            return WalkerState::Stopped(StopReason::PageLimit);
        }

        if let Err(err) = self.source.trigger_next_page().await {
            warn!(page, error_kind = err.kind(), "Could not move to next page: {err}");
            run.error = Some(err.to_string());
            return WalkerState::Stopped(StopReason::NavigationError);
        }
        tokio::time::sleep(self.config.navigation_delay()).await;
        run.cursor.advance();
        WalkerState::FetchingPage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RestrictionConfig;
    use crate::crawl::protocols::{MockDocumentSink, MockIdentityIndex, MockPageSource};
    use crate::testing::fixtures::{ListingFixture, RowFixture};
    use pretty_assertions::assert_eq;

    fn config() -> CrawlConfig {
        CrawlConfig::new()
            .without_delays()
            .with_restrictions(RestrictionConfig::unbounded())
    }

    fn one_page() -> String {
        ListingFixture::new()
            .row(RowFixture::new("A", "https://emvco.test/a", "2025-03-01"))
            .row(RowFixture::new("B", "https://emvco.test/b", "2025-02-01"))
            .render()
    }

    fn single_page_source() -> MockPageSource {
        let mut source = MockPageSource::new();
        let html = one_page();
        source.expect_open().times(1).returning(move |_| Ok(html.clone()));
        source.expect_page_label().returning(|| None);
        source.expect_has_next_page().returning(|_| Ok(false));
        source.expect_trigger_next_page().never();
        source
    }

    #[tokio::test]
    async fn test_index_error_fails_the_run() {
        let mut index = MockIdentityIndex::new();
        index
            .expect_is_known()
            .returning(|_| Err(CrawlError::Index("connection reset".to_string())));
        let mut sink = MockDocumentSink::new();
        sink.expect_emit().never();

        let walker = PaginationWalker::new(
            config(),
            Arc::new(single_page_source()),
            Arc::new(index),
            Arc::new(sink),
        )
        .unwrap();

        let err = walker.run().await.unwrap_err();
        assert_eq!(err.kind(), "index");
    }

    #[tokio::test]
    async fn test_sink_error_fails_the_run() {
        let mut index = MockIdentityIndex::new();
        index.expect_is_known().returning(|_| Ok(false));
        let mut sink = MockDocumentSink::new();
        sink.expect_emit()
            .times(1)
            .returning(|_| Err(CrawlError::Sink("disk full".to_string())));

        let walker = PaginationWalker::new(
            config(),
            Arc::new(single_page_source()),
            Arc::new(index),
            Arc::new(sink),
        )
        .unwrap();

        assert_eq!(walker.run().await.unwrap_err().kind(), "sink");
    }

    #[tokio::test]
    async fn test_documents_carry_source_and_attributes() {
        let mut index = MockIdentityIndex::new();
        index.expect_is_known().returning(|_| Ok(false));
        let mut sink = MockDocumentSink::new();
        sink.expect_emit()
            .times(2)
            .withf(|doc| doc.source == "emvco" && doc.other.doc_type == " ")
            .returning(|_| Ok(()));

        let walker = PaginationWalker::new(
            config(),
            Arc::new(single_page_source()),
            Arc::new(index),
            Arc::new(sink),
        )
        .unwrap();

        let report = walker.run().await.unwrap();
        assert_eq!(report.stop_reason, StopReason::EndOfPagination);
        assert_eq!(report.counters.emitted, 2);
    }

    #[tokio::test]
    async fn test_pagination_lookup_error_ends_pagination() {
        let mut source = MockPageSource::new();
        let html = one_page();
        source.expect_open().returning(move |_| Ok(html.clone()));
        source.expect_page_label().returning(|| Some("1".to_string()));
        source
            .expect_has_next_page()
            .returning(|_| Err(CrawlError::PaginationControl("detached".to_string())));
        source.expect_trigger_next_page().never();

        let mut index = MockIdentityIndex::new();
        index.expect_is_known().returning(|_| Ok(false));
        let mut sink = MockDocumentSink::new();
        sink.expect_emit().returning(|_| Ok(()));

        let walker =
            PaginationWalker::new(config(), Arc::new(source), Arc::new(index), Arc::new(sink))
                .unwrap();

        let report = walker.run().await.unwrap();
        assert_eq!(report.stop_reason, StopReason::EndOfPagination);
        assert!(report.error.is_none());
    }

    #[tokio::test]
    async fn test_open_failure_is_navigation_error() {
        let mut source = MockPageSource::new();
        source
            .expect_open()
            .returning(|url| Err(CrawlError::fetch(url, "timed out")));
        source.expect_current_content().never();

        let walker = PaginationWalker::new(
            config(),
            Arc::new(source),
            Arc::new(MockIdentityIndex::new()),
            Arc::new(MockDocumentSink::new()),
        )
        .unwrap();

        let report = walker.run().await.unwrap();
        assert_eq!(report.stop_reason, StopReason::NavigationError);
        assert!(report.error.unwrap().contains("timed out"));
        assert_eq!(report.counters.pages_visited, 0);
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let result = PaginationWalker::new(
            config().with_max_pages(0),
            Arc::new(MockPageSource::new()),
            Arc::new(MockIdentityIndex::new()),
            Arc::new(MockDocumentSink::new()),
        );
        assert_eq!(result.unwrap_err().kind(), "config");
    }
}
