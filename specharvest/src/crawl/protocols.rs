//! Capability traits the walker drives.
//!
//! The walker never touches a browser, a network client or a database
//! directly. A browser-automation adapter, the HTTP page source and the
//! in-memory store all plug in through these traits.

use async_trait::async_trait;

use crate::core::SpecDocument;
use crate::errors::CrawlError;

/// Access to the listing pages of one crawl session.
///
/// A source is stateful: `open` positions it on the first page and
/// `trigger_next_page` moves it forward. `current_content` always returns
/// the page the source is positioned on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Navigates to the first listing page and returns its content.
    ///
    /// Dismissing a cookie banner is part of opening; failing to do so is
    /// logged, not returned.
    async fn open(&self, url: &str) -> Result<String, CrawlError>;

    /// Returns the content of the current page.
    async fn current_content(&self) -> Result<String, CrawlError>;

    /// Whether the page shows an enabled, visible next-page control.
    ///
    /// An error means the control could not be inspected.
    async fn has_next_page(&self, content: &str) -> Result<bool, CrawlError>;

    /// Activates the next-page control.
    async fn trigger_next_page(&self) -> Result<(), CrawlError>;

    /// The page number as the site displays it, for logging.
    async fn page_label(&self) -> Option<String>;
}

/// Answers whether a document was already processed by an earlier run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityIndex: Send + Sync {
    /// Whether `identity` is already registered.
    async fn is_known(&self, identity: &str) -> Result<bool, CrawlError>;
}

/// Receives accepted documents for registration and storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Hands one accepted document downstream.
    async fn emit(&self, document: SpecDocument) -> Result<(), CrawlError>;
}
