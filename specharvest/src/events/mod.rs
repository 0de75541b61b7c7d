//! Crawl lifecycle events.
//!
//! The walker reports what it does through an `EventSink` so orchestrators
//! can log, count or forward progress without parsing log output.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// Event type names emitted by the walker.
pub mod names {
    /// A crawl began.
    pub const CRAWL_STARTED: &str = "crawl.started";
    /// A listing page was loaded and parsed.
    pub const PAGE_LOADED: &str = "crawl.page_loaded";
    /// A candidate was handed to the sink.
    pub const CANDIDATE_EMITTED: &str = "crawl.candidate_emitted";
    /// A candidate was skipped by a restriction.
    pub const CANDIDATE_SKIPPED: &str = "crawl.candidate_skipped";
    /// The crawl finished with a stop reason.
    pub const CRAWL_STOPPED: &str = "crawl.stopped";
    /// The crawl failed on an index or sink error.
    pub const CRAWL_FAILED: &str = "crawl.failed";
}
