//! CSS selectors describing the listing layout and its pagination control.
//!
//! Defaults match the EMVCo specifications listing.

use serde::{Deserialize, Serialize};

/// Selectors for the listing container, its rows and the row fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSelectors {
    /// Container holding all rows.
    #[serde(default = "default_container")]
    pub container: String,
    /// One element per listed document, relative to the container.
    #[serde(default = "default_row")]
    pub row: String,
    /// Title element inside a row.
    #[serde(default = "default_title")]
    pub title: String,
    /// Published-date element inside a row.
    #[serde(default = "default_published")]
    pub published: String,
    /// Row attribute carrying the document link.
    #[serde(default = "default_link_attribute")]
    pub link_attribute: String,
    /// Document-type element.
    #[serde(default = "default_doc_type")]
    pub doc_type: String,
    /// Technology-category element.
    #[serde(default = "default_tech_category")]
    pub tech_category: String,
    /// Version element.
    #[serde(default = "default_version")]
    pub version: String,
    /// Element whose presence marks the document as downloadable.
    #[serde(default = "default_available")]
    pub available: String,
}

fn default_container() -> String {
    "#filterable_search_results".to_string()
}

fn default_row() -> String {
    "a.inner-table-sections.specifications".to_string()
}

fn default_title() -> String {
    ".title-name".to_string()
}

fn default_published() -> String {
    ".published".to_string()
}

fn default_link_attribute() -> String {
    "data-post-link".to_string()
}

fn default_doc_type() -> String {
    ".spec-cat".to_string()
}

fn default_tech_category() -> String {
    ".tech-cat".to_string()
}

fn default_version() -> String {
    ".version".to_string()
}

fn default_available() -> String {
    ".available-download".to_string()
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: default_container(),
            row: default_row(),
            title: default_title(),
            published: default_published(),
            link_attribute: default_link_attribute(),
            doc_type: default_doc_type(),
            tech_category: default_tech_category(),
            version: default_version(),
            available: default_available(),
        }
    }
}

impl ListingSelectors {
    /// Creates the default (EMVCo) selectors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container selector.
    #[must_use]
    pub fn with_container(mut self, selector: impl Into<String>) -> Self {
        self.container = selector.into();
        self
    }

    /// Sets the row selector.
    #[must_use]
    pub fn with_row(mut self, selector: impl Into<String>) -> Self {
        self.row = selector.into();
        self
    }

    /// Sets the link attribute.
    #[must_use]
    pub fn with_link_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.link_attribute = attribute.into();
        self
    }

    /// All CSS selectors paired with their field names.
    #[must_use]
    pub fn css_selectors(&self) -> [(&'static str, &str); 8] {
        [
            ("container", self.container.as_str()),
            ("row", self.row.as_str()),
            ("title", self.title.as_str()),
            ("published", self.published.as_str()),
            ("doc_type", self.doc_type.as_str()),
            ("tech_category", self.tech_category.as_str()),
            ("version", self.version.as_str()),
            ("available", self.available.as_str()),
        ]
    }
}

/// Selectors and markers for the pagination control and page chrome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSelectors {
    /// The next-page control.
    #[serde(default = "default_next_control")]
    pub next_control: String,
    /// Inline style fragment marking the control as hidden.
    #[serde(default = "default_hidden_style")]
    pub hidden_style: String,
    /// Classes marking the control as disabled.
    #[serde(default = "default_disabled_classes")]
    pub disabled_classes: Vec<String>,
    /// Element showing the current page number.
    #[serde(default = "default_page_label")]
    pub page_label: String,
    /// Cookie-banner buttons.
    #[serde(default = "default_cookie_button")]
    pub cookie_button: String,
    /// Text of the accepting cookie button.
    #[serde(default = "default_cookie_accept_text")]
    pub cookie_accept_text: String,
    /// Query parameter used for paging when the control has no usable link.
    ///
    /// Unset in the default EMVCo profile, whose next arrow is script-driven
    /// (`href="#"`). Page sources that cannot run scripts need it to get
    /// past the first page.
    #[serde(default)]
    pub page_param: Option<String>,
}

fn default_next_control() -> String {
    "a[data-direction*='next']".to_string()
}

fn default_hidden_style() -> String {
    "display: none".to_string()
}

fn default_disabled_classes() -> Vec<String> {
    vec!["disabled".to_string()]
}

fn default_page_label() -> String {
    "#current_page".to_string()
}

fn default_cookie_button() -> String {
    ".ui-button".to_string()
}

fn default_cookie_accept_text() -> String {
    "Accept".to_string()
}

impl Default for PaginationSelectors {
    fn default() -> Self {
        Self {
            next_control: default_next_control(),
            hidden_style: default_hidden_style(),
            disabled_classes: default_disabled_classes(),
            page_label: default_page_label(),
            cookie_button: default_cookie_button(),
            cookie_accept_text: default_cookie_accept_text(),
            page_param: None,
        }
    }
}

impl PaginationSelectors {
    /// Creates the default (EMVCo) pagination selectors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the next-control selector.
    #[must_use]
    pub fn with_next_control(mut self, selector: impl Into<String>) -> Self {
        self.next_control = selector.into();
        self
    }

    /// Sets the paging query parameter.
    #[must_use]
    pub fn with_page_param(mut self, param: impl Into<String>) -> Self {
        self.page_param = Some(param.into());
        self
    }
}
