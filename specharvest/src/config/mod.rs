//! Crawl configuration.
//!
//! Every struct here deserializes from partial JSON; missing fields take
//! the EMVCo defaults.

mod fetch;
mod restrictions;
mod selectors;

pub use fetch::{FetchConfig, RetryConfig};
pub use restrictions::{RestrictionConfig, RestrictionOrder, UndatedPolicy};
pub use selectors::{ListingSelectors, PaginationSelectors};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::CrawlError;

/// Default listing URL.
pub const DEFAULT_START_URL: &str = "https://www.emvco.com/specifications/";

/// Default source reference attached to emitted documents.
pub const DEFAULT_SOURCE: &str = "emvco";

/// Complete configuration for one crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Source reference stamped on emitted documents.
    #[serde(default = "default_source")]
    pub source: String,
    /// First listing page.
    #[serde(default = "default_start_url")]
    pub start_url: String,
    /// Wait after opening the first page, in seconds.
    #[serde(default = "default_settle_delay")]
    pub initial_delay_seconds: f64,
    /// Wait after triggering the next page, in seconds.
    #[serde(default = "default_settle_delay")]
    pub navigation_delay_seconds: f64,
    /// Upper bound on processed pages.
    #[serde(default = "default_max_pages")]
    pub max_pages: Option<usize>,
    /// Restrictions applied to candidates.
    #[serde(default)]
    pub restrictions: RestrictionConfig,
    /// Listing layout.
    #[serde(default)]
    pub listing: ListingSelectors,
    /// Pagination control and page chrome.
    #[serde(default)]
    pub pagination: PaginationSelectors,
    /// HTTP settings, used by the HTTP page source.
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_start_url() -> String {
    DEFAULT_START_URL.to_string()
}

fn default_settle_delay() -> f64 {
    3.0
}

fn default_max_pages() -> Option<usize> {
    Some(500)
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            start_url: default_start_url(),
            initial_delay_seconds: default_settle_delay(),
            navigation_delay_seconds: default_settle_delay(),
            max_pages: default_max_pages(),
            restrictions: RestrictionConfig::default(),
            listing: ListingSelectors::default(),
            pagination: PaginationSelectors::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl CrawlConfig {
    /// Creates the default EMVCo crawl configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, CrawlError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Sets the source reference.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the start URL.
    #[must_use]
    pub fn with_start_url(mut self, url: impl Into<String>) -> Self {
        self.start_url = url.into();
        self
    }

    /// Sets both settle delays.
    #[must_use]
    pub fn with_settle_delays(mut self, initial_seconds: f64, navigation_seconds: f64) -> Self {
        self.initial_delay_seconds = initial_seconds;
        self.navigation_delay_seconds = navigation_seconds;
        self
    }

    /// Disables both settle delays.
    #[must_use]
    pub fn without_delays(self) -> Self {
        self.with_settle_delays(0.0, 0.0)
    }

    /// Sets the page cap.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Sets the restrictions.
    #[must_use]
    pub fn with_restrictions(mut self, restrictions: RestrictionConfig) -> Self {
        self.restrictions = restrictions;
        self
    }

    /// Sets the listing selectors.
    #[must_use]
    pub fn with_listing(mut self, listing: ListingSelectors) -> Self {
        self.listing = listing;
        self
    }

    /// Sets the pagination selectors.
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationSelectors) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Settle delay after the first page is opened.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        settle_delay(self.initial_delay_seconds)
    }

    /// Settle delay after each navigation.
    #[must_use]
    pub fn navigation_delay(&self) -> Duration {
        settle_delay(self.navigation_delay_seconds)
    }

    /// Checks the configuration for values the crawler cannot work with.
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.source.trim().is_empty() {
            return Err(CrawlError::config("source must not be empty"));
        }
        if self.start_url.trim().is_empty() {
            return Err(CrawlError::config("start_url must not be empty"));
        }
        for (name, value) in [
            ("initial_delay_seconds", self.initial_delay_seconds),
            ("navigation_delay_seconds", self.navigation_delay_seconds),
        ] {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(CrawlError::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.max_pages == Some(0) {
            return Err(CrawlError::config("max_pages must be at least 1"));
        }
        self.fetch.validate().map_err(CrawlError::Config)?;
        for (name, selector) in self.listing.css_selectors() {
            if selector.trim().is_empty() {
                return Err(CrawlError::config(format!("listing.{name} must not be empty")));
            }
        }
        if self.listing.link_attribute.trim().is_empty() {
            return Err(CrawlError::config("listing.link_attribute must not be empty"));
        }
        if self.pagination.next_control.trim().is_empty() {
            return Err(CrawlError::config("pagination.next_control must not be empty"));
        }
        self.restrictions.validate().map_err(CrawlError::Config)
    }
}

/// Negative or unrepresentable delays become zero; `validate` reports them.
fn settle_delay(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}
