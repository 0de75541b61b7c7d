//! Inspection of the next-page control and page chrome in listing HTML.

use scraper::{Html, Selector};

use crate::config::PaginationSelectors;
use crate::errors::CrawlError;
use crate::extract::{compile_selector, element_text};

/// State of the next-page control on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextControl {
    /// No control on the page.
    Absent,
    /// The control exists but is hidden by its inline style.
    Hidden,
    /// The control exists but is marked disabled.
    Disabled,
    /// The control can be followed.
    Enabled {
        /// The control's `href`, if it carries a usable one.
        href: Option<String>,
    },
}

impl NextControl {
    /// Whether another page can be reached.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }
}

/// Reads the pagination control, page label and cookie banner from HTML.
#[derive(Debug)]
pub struct PaginationInspector {
    config: PaginationSelectors,
    next_control: Selector,
    page_label: Selector,
    cookie_button: Selector,
}

impl PaginationInspector {
    /// Creates an inspector, compiling the configured selectors.
    pub fn new(config: PaginationSelectors) -> Result<Self, CrawlError> {
        Ok(Self {
            next_control: compile_selector(&config.next_control)?,
            page_label: compile_selector(&config.page_label)?,
            cookie_button: compile_selector(&config.cookie_button)?,
            config,
        })
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &PaginationSelectors {
        &self.config
    }

    /// Classifies the next-page control of a page.
    #[must_use]
    pub fn inspect(&self, html: &str) -> NextControl {
        let document = Html::parse_document(html);
        let Some(control) = document.select(&self.next_control).next() else {
            return NextControl::Absent;
        };
        let element = control.value();

        let hidden_marker = squash(&self.config.hidden_style);
        if let Some(style) = element.attr("style") {
            if !hidden_marker.is_empty() && squash(style).contains(&hidden_marker) {
                return NextControl::Hidden;
            }
        }

        let disabled_class = element
            .classes()
            .any(|class| self.config.disabled_classes.iter().any(|d| d == class));
        let aria_disabled = element
            .attr("aria-disabled")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        if disabled_class || aria_disabled || element.attr("disabled").is_some() {
            return NextControl::Disabled;
        }

        let href = element
            .attr("href")
            .map(str::trim)
            .filter(|h| is_followable(h))
            .map(ToString::to_string);
        NextControl::Enabled { href }
    }

    /// Text of the current-page label, if present.
    #[must_use]
    pub fn page_label(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.page_label)
            .next()
            .map(element_text)
            .filter(|label| !label.is_empty())
    }

    /// Whether the page shows a cookie button with the accepting text.
    #[must_use]
    pub fn has_cookie_prompt(&self, html: &str) -> bool {
        let document = Html::parse_document(html);
        let wanted = self.config.cookie_accept_text.as_str();
        document
            .select(&self.cookie_button)
            .any(|button| element_text(button).contains(wanted))
    }
}

/// Lowercase with all whitespace removed, so `display:none` and
/// `display: none;` compare equal.
fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_followable(href: &str) -> bool {
    !(href.is_empty() || href.starts_with('#') || href.to_ascii_lowercase().starts_with("javascript:"))
}
