//! Request settings for the HTTP page source.
//!
//! Every listing page the crawler downloads goes through one of these
//! policies: the first page on `open`, then each page reached by the next
//! control. Settle delays between pages live on `CrawlConfig`, not here.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u32 = 30;

/// How listing pages are requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout, in seconds. Must be positive.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Redirect hops followed before a page request fails.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Sent as `User-Agent` on every listing request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Listing pages larger than this are refused as a fetch error.
    #[serde(default = "default_max_page_bytes")]
    pub max_page_bytes: usize,
    /// Extra headers, e.g. `Accept-Language` for sites that localize dates.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Retry policy for a listing page request.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout() -> f64 {
    f64::from(DEFAULT_TIMEOUT_SECONDS)
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    concat!("specharvest/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_page_bytes() -> usize {
    5 * 1024 * 1024
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
            max_page_bytes: default_max_page_bytes(),
            headers: HashMap::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl FetchConfig {
    /// Creates a fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the page size limit.
    #[must_use]
    pub fn with_max_page_bytes(mut self, bytes: usize) -> Self {
        self.max_page_bytes = bytes;
        self
    }

    /// Replaces the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Timeout as a `Duration`.
    ///
    /// Falls back to the default timeout when `timeout_seconds` is not a
    /// valid duration; `validate` reports that case.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        seconds_to_duration(self.timeout_seconds)
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or_else(|| Duration::from_secs(u64::from(DEFAULT_TIMEOUT_SECONDS)))
    }

    /// Checks that every duration is usable.
    pub fn validate(&self) -> Result<(), String> {
        match seconds_to_duration(self.timeout_seconds) {
            Some(timeout) if !timeout.is_zero() => {}
            _ => {
                return Err(format!(
                    "fetch.timeout_seconds must be a positive number, got {}",
                    self.timeout_seconds
                ))
            }
        }
        if self.max_page_bytes == 0 {
            return Err("fetch.max_page_bytes must be at least 1".to_string());
        }
        self.retry.validate()
    }
}

/// When and how often a failed listing request is repeated.
///
/// A request is retried when the server answers with one of
/// `retry_statuses`, or when it times out or cannot connect and
/// `retry_transport_errors` is set. Anything else fails the page at once,
/// which the walker reports as a navigation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt; `0` disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Wait before the first retry, in seconds.
    #[serde(default = "default_first_delay")]
    pub first_delay_seconds: f64,
    /// Each further retry waits this many times longer.
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    /// No single wait exceeds this, in seconds.
    #[serde(default = "default_delay_cap")]
    pub delay_cap_seconds: f64,
    /// Response statuses that mean "try the same page again".
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: HashSet<u16>,
    /// Also retry timeouts and refused connections.
    #[serde(default = "default_true")]
    pub retry_transport_errors: bool,
}

fn default_max_retries() -> usize {
    2
}

fn default_first_delay() -> f64 {
    1.0
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_delay_cap() -> f64 {
    20.0
}

fn default_retry_statuses() -> HashSet<u16> {
    [429, 500, 502, 503, 504].into_iter().collect()
}

fn default_true() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            first_delay_seconds: default_first_delay(),
            backoff_factor: default_backoff_factor(),
            delay_cap_seconds: default_delay_cap(),
            retry_statuses: default_retry_statuses(),
            retry_transport_errors: default_true(),
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Wait before retry number `attempt` (0-based), capped at
    /// `delay_cap_seconds`. Values too large for a `Duration` saturate.
    #[must_use]
    pub fn delay_before_retry(&self, attempt: usize) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let delay = self.first_delay_seconds * self.backoff_factor.powi(exponent);
        let capped = delay.min(self.delay_cap_seconds).max(0.0);
        Duration::try_from_secs_f64(capped).unwrap_or(Duration::MAX)
    }

    /// Whether a response status should be retried.
    #[must_use]
    pub fn retries_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Checks the backoff settings.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("first_delay_seconds", self.first_delay_seconds),
            ("delay_cap_seconds", self.delay_cap_seconds),
        ] {
            if seconds_to_duration(value).is_none() {
                return Err(format!(
                    "fetch.retry.{name} must be a non-negative number of seconds, got {value}"
                ));
            }
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(format!(
                "fetch.retry.backoff_factor must be at least 1, got {}",
                self.backoff_factor
            ));
        }
        Ok(())
    }
}

fn seconds_to_duration(seconds: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(seconds).ok()
}
