//! End-to-end crawl scenarios over scripted listing pages.

#[cfg(test)]
mod tests {
    use crate::config::{CrawlConfig, RestrictionConfig, UndatedPolicy};
    use crate::core::{CrawlReport, StopReason};
    use crate::crawl::PaginationWalker;
    use crate::events::{names, CollectingEventSink};
    use crate::store::MemoryStore;
    use crate::testing::{
        assert_emitted_links, assert_none_before, assert_stopped_with, assert_unique_links,
        FailingIndex, FailingSink, ListingFixture, NextFixture, RowFixture, ScriptedPageSource,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const START_URL: &str = "https://emvco.test/specifications/";

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn config(restrictions: RestrictionConfig) -> CrawlConfig {
        CrawlConfig::new()
            .with_start_url(START_URL)
            .without_delays()
            .with_restrictions(restrictions)
    }

    fn walker(
        config: CrawlConfig,
        source: &Arc<ScriptedPageSource>,
        store: &MemoryStore,
    ) -> PaginationWalker {
        PaginationWalker::new(
            config,
            source.clone(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
        .unwrap()
    }

    async fn crawl(
        pages: Vec<String>,
        restrictions: RestrictionConfig,
        store: &MemoryStore,
    ) -> (CrawlReport, Arc<ScriptedPageSource>) {
        let source = Arc::new(ScriptedPageSource::new(pages));
        let report = walker(config(restrictions), &source, store).run().await.unwrap();
        (report, source)
    }

    fn page(prefix: &str, dates: &[&str], next: NextFixture) -> String {
        ListingFixture::dated(prefix, dates).next(next).render()
    }

    #[tokio::test]
    async fn test_date_floor_stops_mid_page() {
        let store = MemoryStore::new();
        let pages = vec![page(
            "p1",
            &["2025-03-01", "2025-02-15", "2024-12-01"],
            NextFixture::Script,
        )];

        let (report, source) = crawl(
            pages,
            RestrictionConfig::unbounded().with_from_date(day(2025, 1, 1)),
            &store,
        )
        .await;

        assert_stopped_with(&report, StopReason::DateExceeded);
        assert!(report.reached_restriction_boundary());
        assert_emitted_links(
            &store.documents(),
            &["https://emvco.test/p1-0", "https://emvco.test/p1-1"],
        );
        assert_eq!(source.trigger_count(), 0);
        assert_eq!(source.opened_urls(), vec![START_URL]);
    }

    #[tokio::test]
    async fn test_month_year_dates_respect_date_floor() {
        let store = MemoryStore::new();
        let pages = vec![page(
            "p1",
            &["March 2025", "February 2025", "December 2024"],
            NextFixture::Script,
        )];

        let (report, _) = crawl(
            pages,
            RestrictionConfig::unbounded().with_from_date(day(2025, 1, 1)),
            &store,
        )
        .await;

        assert_stopped_with(&report, StopReason::DateExceeded);
        let documents = store.documents();
        assert_emitted_links(
            &documents,
            &["https://emvco.test/p1-0", "https://emvco.test/p1-1"],
        );
        assert_eq!(documents[0].published, Some(day(2025, 3, 1)));
    }

    #[tokio::test]
    async fn test_date_floor_is_monotonic_across_pages() {
        let store = MemoryStore::new();
        let floor = day(2025, 1, 1);
        let pages = vec![
            page("p1", &["2025-06-01", "2025-05-01"], NextFixture::Script),
            page("p2", &["2025-03-01", "2024-11-30", "2025-02-01"], NextFixture::Script),
            page("p3", &["2025-01-15"], NextFixture::Absent),
        ];

        let (report, source) =
            crawl(pages, RestrictionConfig::unbounded().with_from_date(floor), &store).await;

        assert_stopped_with(&report, StopReason::DateExceeded);
        let documents = store.documents();
        assert_none_before(&documents, floor);
        assert_emitted_links(
            &documents,
            &[
                "https://emvco.test/p1-0",
                "https://emvco.test/p1-1",
                "https://emvco.test/p2-0",
            ],
        );
        // Page 3 is never requested once the boundary is crossed.
        assert_eq!(source.trigger_count(), 1);
        assert_eq!(report.counters.pages_visited, 2);
    }

    #[tokio::test]
    async fn test_row_missing_link_is_isolated() {
        let store = MemoryStore::new();
        let html = ListingFixture::new()
            .row(RowFixture::new("A", "https://emvco.test/a", "2025-03-01"))
            .row(RowFixture::new("B", "https://emvco.test/b", "2025-02-20").without_link())
            .row(RowFixture::new("C", "https://emvco.test/c", "2025-02-10").version("1.0"))
            .render();

        let (report, _) = crawl(vec![html], RestrictionConfig::unbounded(), &store).await;

        assert_stopped_with(&report, StopReason::EndOfPagination);
        assert_emitted_links(
            &store.documents(),
            &["https://emvco.test/a", "https://emvco.test/c"],
        );
        assert_eq!(report.counters.candidates_seen, 2);
        assert_eq!(store.documents()[1].other.version, "1.0");
    }

    #[tokio::test]
    async fn test_last_page_rows_are_emitted_before_end() {
        let store = MemoryStore::new();
        let pages = vec![
            page("p1", &["2025-03-01", "2025-02-01"], NextFixture::Script),
            page("p2", &["2025-01-01", "2024-12-01"], NextFixture::Absent),
        ];

        let (report, source) = crawl(pages, RestrictionConfig::unbounded(), &store).await;

        assert_stopped_with(&report, StopReason::EndOfPagination);
        assert!(!report.reached_restriction_boundary());
        assert_eq!(store.len(), 4);
        assert_eq!(store.links()[3], "https://emvco.test/p2-1");
        assert_eq!(report.counters.pages_visited, 2);
        assert_eq!(source.trigger_count(), 1);
    }

    #[tokio::test]
    async fn test_hidden_or_disabled_control_ends_pagination() {
        for next in [NextFixture::Hidden, NextFixture::Disabled] {
            let store = MemoryStore::new();
            let pages = vec![
                page("p1", &["2025-03-01"], next),
                page("p2", &["2025-02-01"], NextFixture::Absent),
            ];

            let (report, source) = crawl(pages, RestrictionConfig::unbounded(), &store).await;

            assert_stopped_with(&report, StopReason::EndOfPagination);
            assert_eq!(store.len(), 1);
            assert_eq!(source.trigger_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_rerun_emits_nothing_new() {
        let store = MemoryStore::new();
        let pages = vec![
            page("p1", &["2025-03-01", "2025-02-01"], NextFixture::Script),
            page("p2", &["2025-01-01"], NextFixture::Absent),
        ];

        let (first, _) = crawl(pages.clone(), RestrictionConfig::unbounded(), &store).await;
        let (second, _) = crawl(pages, RestrictionConfig::unbounded(), &store).await;

        assert_eq!(first.counters.emitted, 3);
        assert_eq!(second.counters.emitted, 0);
        assert_eq!(second.counters.skipped_known, 3);
        assert_stopped_with(&second, StopReason::EndOfPagination);
        assert_eq!(store.len(), 3);
        assert_unique_links(&store.documents());
    }

    #[tokio::test]
    async fn test_rerun_picks_up_only_new_documents() {
        let store = MemoryStore::with_known(["https://emvco.test/p1-1", "https://emvco.test/p1-2"]);
        let pages = vec![page(
            "p1",
            &["2025-04-01", "2025-03-01", "2025-02-01"],
            NextFixture::Absent,
        )];

        let (report, _) = crawl(pages, RestrictionConfig::unbounded(), &store).await;

        assert_emitted_links(&store.documents(), &["https://emvco.test/p1-0"]);
        assert_eq!(report.counters.skipped_known, 2);
    }

    #[tokio::test]
    async fn test_stop_at_last_seen() {
        let store = MemoryStore::with_known(["https://emvco.test/p1-1"]);
        let pages = vec![page(
            "p1",
            &["2025-04-01", "2025-03-01", "2025-02-01"],
            NextFixture::Script,
        )];

        let (report, source) = crawl(
            pages,
            RestrictionConfig::unbounded().stop_at_last_seen(),
            &store,
        )
        .await;

        assert_stopped_with(&report, StopReason::KnownReached);
        assert!(report.reached_restriction_boundary());
        assert_emitted_links(&store.documents(), &["https://emvco.test/p1-0"]);
        assert_eq!(source.trigger_count(), 0);
    }

    #[tokio::test]
    async fn test_stuck_navigation_terminates() {
        let store = MemoryStore::new();
        let source = Arc::new(
            ScriptedPageSource::new(vec![page("p1", &["2025-03-01"], NextFixture::Script)]).stuck(),
        );

        let report = walker(config(RestrictionConfig::unbounded()), &source, &store)
            .run()
            .await
            .unwrap();

        assert_stopped_with(&report, StopReason::EndOfPagination);
        assert_eq!(report.counters.pages_visited, 1);
        assert_eq!(source.trigger_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_page_cap_terminates_endless_listing() {
        let store = MemoryStore::new();
        let pages: Vec<String> = (0..5)
            .map(|i| page(&format!("p{i}"), &["2025-03-01"], NextFixture::Script))
            .collect();
        let source = Arc::new(ScriptedPageSource::new(pages));

        let report = walker(
            config(RestrictionConfig::unbounded()).with_max_pages(2),
            &source,
            &store,
        )
        .run()
        .await
        .unwrap();

        assert_stopped_with(&report, StopReason::PageLimit);
        assert_eq!(report.counters.pages_visited, 2);
        assert_eq!(source.trigger_count(), 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_max_items_exact_across_pages() {
        let store = MemoryStore::new();
        let pages = vec![
            page("p1", &["2025-03-01", "2025-02-01"], NextFixture::Script),
            page("p2", &["2025-01-01", "2024-12-01"], NextFixture::Script),
            page("p3", &["2024-11-01"], NextFixture::Absent),
        ];

        let (report, source) =
            crawl(pages, RestrictionConfig::new().with_max_items(3), &store).await;

        assert_stopped_with(&report, StopReason::MaxReached);
        assert_eq!(store.len(), 3);
        assert_eq!(report.counters.emitted, 3);
        assert_eq!(source.trigger_count(), 1);
    }

    #[tokio::test]
    async fn test_max_items_on_page_boundary_does_not_navigate() {
        let store = MemoryStore::new();
        let pages = vec![
            page("p1", &["2025-03-01", "2025-02-01"], NextFixture::Script),
            page("p2", &["2025-01-01"], NextFixture::Absent),
        ];

        let (report, source) =
            crawl(pages, RestrictionConfig::new().with_max_items(2), &store).await;

        assert_stopped_with(&report, StopReason::MaxReached);
        assert_eq!(store.len(), 2);
        assert_eq!(source.trigger_count(), 0);
    }

    #[tokio::test]
    async fn test_default_cap_is_fifty() {
        let store = MemoryStore::new();
        let dates: Vec<String> = (1..=30).map(|d| format!("2025-01-{d:02}")).collect();
        let dates: Vec<&str> = dates.iter().map(String::as_str).collect();
        let pages = vec![
            page("p1", &dates, NextFixture::Script),
            page("p2", &dates, NextFixture::Absent),
        ];

        let (report, _) = crawl(pages, RestrictionConfig::default(), &store).await;

        assert_stopped_with(&report, StopReason::MaxReached);
        assert_eq!(store.len(), 50);
    }

    #[tokio::test]
    async fn test_zero_cap_emits_nothing() {
        let store = MemoryStore::new();
        let pages = vec![page("p1", &["2025-03-01"], NextFixture::Absent)];

        let (report, _) = crawl(pages, RestrictionConfig::new().with_max_items(0), &store).await;

        assert_stopped_with(&report, StopReason::MaxReached);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_navigation_failure_keeps_emitted_documents() {
        let store = MemoryStore::new();
        let source = Arc::new(
            ScriptedPageSource::new(vec![
                page("p1", &["2025-03-01", "2025-02-01"], NextFixture::Script),
                page("p2", &["2025-01-01"], NextFixture::Absent),
            ])
            .failing_trigger_on(1),
        );

        let report = walker(config(RestrictionConfig::unbounded()), &source, &store)
            .run()
            .await
            .unwrap();

        assert_stopped_with(&report, StopReason::NavigationError);
        assert!(report.stop_reason.is_failure());
        assert!(report.error.as_deref().unwrap().contains("page 1"));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_open_failure_is_navigation_error() {
        let store = MemoryStore::new();
        let source = Arc::new(ScriptedPageSource::new(Vec::new()).failing_open());

        let report = walker(config(RestrictionConfig::unbounded()), &source, &store)
            .run()
            .await
            .unwrap();

        assert_stopped_with(&report, StopReason::NavigationError);
        assert_eq!(report.counters.pages_visited, 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_control_lookup_failure_ends_pagination() {
        let store = MemoryStore::new();
        let source = Arc::new(
            ScriptedPageSource::new(vec![
                page("p1", &["2025-03-01"], NextFixture::Script),
                page("p2", &["2025-02-01"], NextFixture::Absent),
            ])
            .failing_lookup(),
        );

        let report = walker(config(RestrictionConfig::unbounded()), &source, &store)
            .run()
            .await
            .unwrap();

        assert_stopped_with(&report, StopReason::EndOfPagination);
        assert!(report.error.is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_page_without_listing_continues() {
        let store = MemoryStore::new();
        let pages = vec![
            ListingFixture::new()
                .row(RowFixture::new("A", "https://emvco.test/a", "2025-03-01"))
                .without_container()
                .next(NextFixture::Script)
                .render(),
            page("p2", &["2025-02-01"], NextFixture::Absent),
        ];

        let (report, _) = crawl(pages, RestrictionConfig::unbounded(), &store).await;

        assert_stopped_with(&report, StopReason::EndOfPagination);
        assert_emitted_links(&store.documents(), &["https://emvco.test/p2-0"]);
        assert_eq!(report.counters.pages_visited, 2);
    }

    #[tokio::test]
    async fn test_undated_rows_follow_policy() {
        let pages = vec![ListingFixture::new()
            .row(RowFixture::new("Dated", "https://emvco.test/dated", "2025-03-01"))
            .row(RowFixture::new("Draft", "https://emvco.test/draft", "To be announced"))
            .row(RowFixture::new("Old", "https://emvco.test/old", "2024-01-01"))
            .render()];
        let floor = RestrictionConfig::unbounded().with_from_date(day(2025, 1, 1));

        let pass = MemoryStore::new();
        let (report, _) = crawl(pages.clone(), floor.clone(), &pass).await;
        assert_stopped_with(&report, StopReason::DateExceeded);
        assert_emitted_links(
            &pass.documents(),
            &["https://emvco.test/dated", "https://emvco.test/draft"],
        );
        assert!(pass.documents()[1].published.is_none());

        let drop = MemoryStore::new();
        let (report, _) = crawl(pages, floor.with_undated(UndatedPolicy::Drop), &drop).await;
        assert_emitted_links(&drop.documents(), &["https://emvco.test/dated"]);
        assert_eq!(report.counters.skipped_undated, 1);
    }

    #[tokio::test]
    async fn test_to_date_skips_newer_documents() {
        let store = MemoryStore::new();
        let pages = vec![page(
            "p1",
            &["2025-06-01", "2025-03-01", "2025-02-01"],
            NextFixture::Absent,
        )];

        let (report, _) = crawl(
            pages,
            RestrictionConfig::unbounded().with_to_date(day(2025, 4, 1)),
            &store,
        )
        .await;

        assert_emitted_links(
            &store.documents(),
            &["https://emvco.test/p1-1", "https://emvco.test/p1-2"],
        );
        assert_eq!(report.counters.skipped_after_to_date, 1);
    }

    #[tokio::test]
    async fn test_events_describe_the_run() {
        let store = MemoryStore::with_known(["https://emvco.test/p1-1"]);
        let events = Arc::new(CollectingEventSink::new());
        let source = Arc::new(ScriptedPageSource::new(vec![
            page("p1", &["2025-03-01", "2025-02-01"], NextFixture::Script),
            page("p2", &["2024-06-01"], NextFixture::Absent),
        ]));

        let report = walker(
            config(RestrictionConfig::unbounded().with_from_date(day(2025, 1, 1))),
            &source,
            &store,
        )
        .with_event_sink(events.clone())
        .run()
        .await
        .unwrap();

        let types = events.event_types();
        assert_eq!(types.first().map(String::as_str), Some(names::CRAWL_STARTED));
        assert_eq!(types.last().map(String::as_str), Some(names::CRAWL_STOPPED));
        assert_eq!(events.count_of(names::PAGE_LOADED), 2);
        assert_eq!(events.count_of(names::CANDIDATE_EMITTED), 1);
        assert_eq!(events.count_of(names::CANDIDATE_SKIPPED), 1);

        let stopped = &events.payloads_of(names::CRAWL_STOPPED)[0];
        assert_eq!(stopped["stop_reason"], "date_exceeded");
        assert_eq!(stopped["run_id"], report.run_id.to_string());
        assert_eq!(stopped["skipped_known"], 1);
    }

    #[tokio::test]
    async fn test_index_failure_fails_the_run() {
        let events = Arc::new(CollectingEventSink::new());
        let source = Arc::new(ScriptedPageSource::new(vec![page(
            "p1",
            &["2025-03-01"],
            NextFixture::Absent,
        )]));

        let err = PaginationWalker::new(
            config(RestrictionConfig::unbounded()),
            source,
            Arc::new(FailingIndex),
            Arc::new(MemoryStore::new()),
        )
        .unwrap()
        .with_event_sink(events.clone())
        .run()
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "index");
        assert_eq!(events.count_of(names::CRAWL_FAILED), 1);
        assert_eq!(events.count_of(names::CRAWL_STOPPED), 0);
    }

    #[tokio::test]
    async fn test_sink_failure_fails_the_run() {
        let sink = Arc::new(FailingSink::after(1));
        let source = Arc::new(ScriptedPageSource::new(vec![page(
            "p1",
            &["2025-03-01", "2025-02-01"],
            NextFixture::Absent,
        )]));

        let err = PaginationWalker::new(
            config(RestrictionConfig::unbounded()),
            source,
            Arc::new(MemoryStore::new()),
            sink.clone(),
        )
        .unwrap()
        .run()
        .await
        .unwrap_err();

        assert_eq!(err.kind(), "sink");
        assert_eq!(sink.accepted(), vec!["https://emvco.test/p1-0"]);
    }
}
