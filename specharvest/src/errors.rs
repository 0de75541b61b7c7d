//! Error types for the crawler.
//!
//! Most failures never leave the walker: row problems are skipped, and
//! fetch or navigation failures end the crawl with a reason code. The
//! variants here cover what does propagate (index and sink failures,
//! configuration problems) plus the errors capability adapters report
//! back to the walker.

use std::collections::HashMap;
use thiserror::Error;

use crate::utils::timestamps::TimestampError;

/// The main error type for crawler operations.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Fetching a page failed (transport error, bad status, timeout).
    #[error("Fetch failed for {url}: {message}")]
    Fetch {
        /// The URL being fetched.
        url: String,
        /// What went wrong.
        message: String,
    },

    /// A navigation action (next page, reading current content) failed.
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// The pagination control could not be located or inspected.
    #[error("Pagination control lookup failed: {0}")]
    PaginationControl(String),

    /// A configured CSS selector does not parse.
    #[error("Invalid selector `{selector}`: {message}")]
    Selector {
        /// The selector text.
        selector: String,
        /// Parser message.
        message: String,
    },

    /// The crawl configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The identity index could not answer a novelty query.
    #[error("Identity index error: {0}")]
    Index(String),

    /// The downstream sink rejected a document.
    #[error("Document sink error: {0}")]
    Sink(String),

    /// A date could not be parsed.
    #[error("{0}")]
    Timestamp(#[from] TimestampError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for CrawlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl CrawlError {
    /// Creates a fetch error.
    #[must_use]
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a navigation error.
    #[must_use]
    pub fn navigation(message: impl Into<String>) -> Self {
        Self::Navigation(message.into())
    }

    /// Creates a selector error.
    #[must_use]
    pub fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns true for failures that end a crawl with `NavigationError`
    /// instead of propagating.
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Navigation(_))
    }

    /// Short machine-readable kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Navigation(_) => "navigation",
            Self::PaginationControl(_) => "pagination_control",
            Self::Selector { .. } => "selector",
            Self::Config(_) => "config",
            Self::Index(_) => "index",
            Self::Sink(_) => "sink",
            Self::Timestamp(_) => "timestamp",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.kind()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        match self {
            Self::Fetch { url, .. } => {
                map.insert("url".to_string(), serde_json::json!(url));
            }
            Self::Selector { selector, .. } => {
                map.insert("selector".to_string(), serde_json::json!(selector));
            }
            _ => {}
        }
        map
    }
}

/// A required row field could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required field `{field}`")]
pub struct MissingField {
    /// Name of the field.
    pub field: &'static str,
}

impl MissingField {
    /// Creates a new missing field error.
    #[must_use]
    pub fn new(field: &'static str) -> Self {
        Self { field }
    }
}
