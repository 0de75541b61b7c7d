//! Core domain model types for the crawler.
//!
//! This module contains the fundamental types shared by the extractor and
//! the walker:
//! - Candidate records parsed from listing rows
//! - The document shape handed to the sink
//! - Walker states, stop and skip reasons
//! - The crawl report

mod document;
mod record;
mod report;
mod status;

pub use document::{DocumentAttributes, SpecDocument};
pub use record::{CandidateRecord, PLACEHOLDER};
pub use report::{CrawlCounters, CrawlReport};
pub use status::{SkipReason, StopReason, WalkerState};
