//! Walker states and stop reasons.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a crawl stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A candidate older than `from_date` was reached.
    DateExceeded,
    /// The next-page control is absent, hidden or disabled.
    EndOfPagination,
    /// The configured number of documents was emitted.
    MaxReached,
    /// A known document was reached while stopping at the last seen item.
    KnownReached,
    /// The configured page cap was reached with pages still remaining.
    PageLimit,
    /// Fetching or navigating failed.
    NavigationError,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateExceeded => write!(f, "date_exceeded"),
            Self::EndOfPagination => write!(f, "end_of_pagination"),
            Self::MaxReached => write!(f, "max_reached"),
            Self::KnownReached => write!(f, "known_reached"),
            Self::PageLimit => write!(f, "page_limit"),
            Self::NavigationError => write!(f, "navigation_error"),
        }
    }
}

impl StopReason {
    /// Returns true when the crawl reached already-processed history.
    ///
    /// Orchestrators use this to tell "caught up" apart from "ran out of
    /// pages".
    #[must_use]
    pub fn is_restriction_boundary(&self) -> bool {
        matches!(self, Self::DateExceeded | Self::KnownReached)
    }

    /// Returns true if a restriction, rather than the listing, ended the
    /// crawl.
    #[must_use]
    pub fn is_restriction(&self) -> bool {
        matches!(self, Self::DateExceeded | Self::KnownReached | Self::MaxReached)
    }

    /// Returns true if the crawl stopped because of a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::NavigationError)
    }
}

/// Why a single candidate was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The identity index already knows the candidate.
    Known,
    /// The candidate is newer than `to_date`.
    AfterToDate,
    /// The candidate has no usable date and undated items are dropped.
    Undated,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known => write!(f, "known"),
            Self::AfterToDate => write!(f, "after_to_date"),
            Self::Undated => write!(f, "undated"),
        }
    }
}

/// State of the pagination walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum WalkerState {
    /// Obtaining the content of the current page.
    FetchingPage,
    /// Filtering and emitting the current page's candidates.
    ProcessingRows,
    /// Looking for and triggering the next-page control.
    AdvancingPage,
    /// Terminal.
    Stopped(StopReason),
}

impl Default for WalkerState {
    fn default() -> Self {
        Self::FetchingPage
    }
}

impl fmt::Display for WalkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchingPage => write!(f, "fetching_page"),
            Self::ProcessingRows => write!(f, "processing_rows"),
            Self::AdvancingPage => write!(f, "advancing_page"),
            Self::Stopped(reason) => write!(f, "stopped({reason})"),
        }
    }
}

impl WalkerState {
    /// Returns true if the state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }

    /// Returns the stop reason for terminal states.
    #[must_use]
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Stopped(reason) => Some(*reason),
            _ => None,
        }
    }
}
