//! Page source that walks a server-rendered listing over plain HTTP.
//!
//! There is no script execution: the next page is reached by following the
//! next control's link, or by bumping the configured page query parameter
//! when the control carries no usable link.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::control::{NextControl, PaginationInspector};
use crate::config::{FetchConfig, PaginationSelectors};
use crate::crawl::PageSource;
use crate::errors::CrawlError;

#[derive(Debug, Default)]
struct Position {
    url: Option<Url>,
    content: Option<String>,
    page: usize,
}

/// `PageSource` backed by `reqwest`.
///
/// Script-driven next controls (`href="#"` or `javascript:`), like the one
/// on the default EMVCo listing, are only followed when
/// `PaginationSelectors::page_param` is set. Without it the walk ends with
/// `NavigationError` when it tries to leave the first page.
#[derive(Debug)]
pub struct HttpPageSource {
    client: Client,
    fetch: FetchConfig,
    inspector: PaginationInspector,
    position: Mutex<Position>,
}

impl HttpPageSource {
    /// Creates a source with its own HTTP client.
    pub fn new(fetch: FetchConfig, pagination: PaginationSelectors) -> Result<Self, CrawlError> {
        fetch.validate().map_err(CrawlError::Config)?;
        let mut headers = HeaderMap::new();
        for (key, value) in &fetch.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| CrawlError::config(format!("invalid header name `{key}`: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| CrawlError::config(format!("invalid value for header `{key}`: {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(fetch.timeout())
            .user_agent(fetch.user_agent.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(fetch.max_redirects))
            .build()
            .map_err(|e| CrawlError::Internal(format!("failed to build HTTP client: {e}")))?;

        if pagination.page_param.is_none() {
            warn!("No page_param configured; script-driven next controls cannot be followed");
        }

        Ok(Self {
            client,
            inspector: PaginationInspector::new(pagination)?,
            fetch,
            position: Mutex::new(Position::default()),
        })
    }

    /// Creates a source from a crawl configuration.
    pub fn from_config(config: &crate::config::CrawlConfig) -> Result<Self, CrawlError> {
        Self::new(config.fetch.clone(), config.pagination.clone())
    }

    /// Fetches a URL, retrying transient failures with backoff.
    async fn fetch(&self, url: &Url) -> Result<String, CrawlError> {
        let retry = &self.fetch.retry;
        let mut attempt = 0;
        loop {
            let started = Instant::now();
            let outcome = self.client.get(url.clone()).send().await;
            let retries_left = attempt < retry.max_retries;

            let response = match outcome {
                Ok(response) => response,
                Err(e)
                    if retries_left
                        && retry.retry_transport_errors
                        && (e.is_timeout() || e.is_connect()) =>
                {
                    let delay = retry.delay_before_retry(attempt);
                    warn!(url = %url, attempt, delay_ms = millis(delay), "Request failed, retrying: {e}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(CrawlError::fetch(url.as_str(), e.to_string())),
            };

            let status = response.status();
            if !status.is_success() {
                if retries_left && retry.retries_status(status.as_u16()) {
                    let delay = retry.delay_before_retry(attempt);
                    warn!(url = %url, status = status.as_u16(), attempt, "Retryable status");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                return Err(CrawlError::fetch(url.as_str(), format!("HTTP {status}")));
            }

            let body = response
                .text()
                .await
                .map_err(|e| CrawlError::fetch(url.as_str(), e.to_string()))?;
            if body.len() > self.fetch.max_page_bytes {
                return Err(CrawlError::fetch(
                    url.as_str(),
                    format!(
                        "response of {} bytes exceeds limit of {}",
                        body.len(),
                        self.fetch.max_page_bytes
                    ),
                ));
            }

            debug!(
                url = %url,
                status = status.as_u16(),
                bytes = body.len(),
                duration_ms = millis(started.elapsed()),
                "Fetched page"
            );
            return Ok(body);
        }
    }

    fn position_snapshot(&self) -> (Option<Url>, Option<String>, usize) {
        let position = self.position.lock();
        (position.url.clone(), position.content.clone(), position.page)
    }

    fn store(&self, url: Url, content: String, page: usize) {
        let mut position = self.position.lock();
        position.url = Some(url);
        position.content = Some(content);
        position.page = page;
    }

    /// Works out where the next control leads.
    fn next_url(&self, current: &Url, content: &str, page: usize) -> Result<Url, CrawlError> {
        match self.inspector.inspect(content) {
            NextControl::Enabled { href: Some(href) } => current
                .join(&href)
                .map_err(|e| CrawlError::navigation(format!("bad next link `{href}`: {e}"))),
            NextControl::Enabled { href: None } => {
                let Some(param) = self.inspector.config().page_param.as_deref() else {
                    return Err(CrawlError::navigation(
                        "next control has no link and no page_param is configured",
                    ));
                };
                Ok(with_page_param(current, param, page + 1))
            }
            other => Err(CrawlError::navigation(format!(
                "no next page to navigate to ({other:?})"
            ))),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Returns `url` with `param` set to `page`, replacing any existing value.
fn with_page_param(url: &Url, param: &str, page: usize) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut next = url.clone();
    {
        let mut pairs = next.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(param, &page.to_string());
    }
    next
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn open(&self, url: &str) -> Result<String, CrawlError> {
        let parsed = Url::parse(url).map_err(|e| CrawlError::fetch(url, e.to_string()))?;
        let content = self.fetch(&parsed).await?;
        if self.inspector.has_cookie_prompt(&content) {
            debug!(url = %parsed, "Cookie prompt present; nothing to accept over HTTP");
        }
        info!(url = %parsed, "Opened listing");
        self.store(parsed, content.clone(), 1);
        Ok(content)
    }

    async fn current_content(&self) -> Result<String, CrawlError> {
        self.position
            .lock()
            .content
            .clone()
            .ok_or_else(|| CrawlError::navigation("no page has been opened"))
    }

    async fn has_next_page(&self, content: &str) -> Result<bool, CrawlError> {
        Ok(self.inspector.inspect(content).is_enabled())
    }

    async fn trigger_next_page(&self) -> Result<(), CrawlError> {
        let (url, content, page) = self.position_snapshot();
        let (Some(url), Some(content)) = (url, content) else {
            return Err(CrawlError::navigation("no page has been opened"));
        };
        let next = self.next_url(&url, &content, page)?;
        debug!(from = %url, to = %next, "Following next control");
        let body = self.fetch(&next).await?;
        self.store(next, body, page + 1);
        Ok(())
    }

    async fn page_label(&self) -> Option<String> {
        let content = self.position.lock().content.clone()?;
        self.inspector.page_label(&content)
    }
}
