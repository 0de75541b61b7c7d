//! # Specharvest
//!
//! An incremental crawler for paginated specification-document listings.
//!
//! Specharvest walks a listing one page at a time, parses each row into a
//! candidate record, and hands new documents to a downstream sink. The walk
//! stops on its own when it reaches documents older than the configured
//! date floor, runs into already-known documents, hits the item cap, or
//! runs out of pages:
//!
//! - **Page extraction**: CSS-selector driven row parsing that tolerates
//!   missing optional fields and drops rows missing required ones
//! - **Pagination walking**: an explicit state machine with a reason code
//!   for every stop
//! - **Restrictions**: novelty, date floor and ceiling, item cap
//! - **Pluggable capabilities**: page sources, identity indexes and sinks
//!   are traits; an HTTP page source and an in-memory store ship with the
//!   crate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use specharvest::prelude::*;
//! use std::sync::Arc;
//!
//! let config = CrawlConfig::from_file("crawl.json")?;
//! let store = MemoryStore::new();
//! let source = Arc::new(HttpPageSource::from_config(&config)?);
//!
//! let walker = PaginationWalker::new(
//!     config,
//!     source,
//!     Arc::new(store.clone()),
//!     Arc::new(store.clone()),
//! )?;
//! let report = walker.run().await?;
//! println!("stopped: {} after {} documents", report.stop_reason, report.emitted());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod crawl;
pub mod errors;
pub mod events;
pub mod extract;
pub mod navigation;
pub mod observability;
pub mod store;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        CrawlConfig, FetchConfig, ListingSelectors, PaginationSelectors, RestrictionConfig,
        RestrictionOrder, RetryConfig, UndatedPolicy,
    };
    pub use crate::core::{
        CandidateRecord, CrawlCounters, CrawlReport, SkipReason, SpecDocument, StopReason,
        WalkerState,
    };
    pub use crate::crawl::{
        DocumentSink, IdentityIndex, PageSource, PaginationWalker, RestrictionFilter, Verdict,
    };
    pub use crate::errors::CrawlError;
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::extract::{HtmlListingExtractor, ListingExtractor};
    #[cfg(feature = "http")]
    pub use crate::navigation::HttpPageSource;
    pub use crate::navigation::{NextControl, PaginationInspector};
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::store::MemoryStore;
    pub use crate::utils::{parse_published, Timestamp};
}
