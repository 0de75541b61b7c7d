//! Listing-page HTML builders in the EMVCo layout.

use std::fmt::Write;

/// How the next-page control is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NextFixture {
    /// No control at all.
    #[default]
    Absent,
    /// A visible control linking to the given href.
    Link(String),
    /// A visible control driven by script (`href="#"`).
    Script,
    /// A control hidden with `display: none;`.
    Hidden,
    /// A control carrying the `disabled` class.
    Disabled,
}

/// One listing row.
#[derive(Debug, Clone)]
pub struct RowFixture {
    title: String,
    link: Option<String>,
    published: Option<String>,
    doc_type: Option<String>,
    tech: Option<String>,
    version: Option<String>,
    available: bool,
}

impl RowFixture {
    /// A row with the required fields only.
    #[must_use]
    pub fn new(title: impl Into<String>, link: impl Into<String>, published: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: Some(link.into()),
            published: Some(published.into()),
            doc_type: None,
            tech: None,
            version: None,
            available: false,
        }
    }

    /// Drops the link attribute.
    #[must_use]
    pub fn without_link(mut self) -> Self {
        self.link = None;
        self
    }

    /// Drops the published element.
    #[must_use]
    pub fn without_published(mut self) -> Self {
        self.published = None;
        self
    }

    /// Sets the document type.
    #[must_use]
    pub fn doc_type(mut self, value: impl Into<String>) -> Self {
        self.doc_type = Some(value.into());
        self
    }

    /// Sets the technology category.
    #[must_use]
    pub fn tech(mut self, value: impl Into<String>) -> Self {
        self.tech = Some(value.into());
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, value: impl Into<String>) -> Self {
        self.version = Some(value.into());
        self
    }

    /// Marks the row as downloadable.
    #[must_use]
    pub fn available(mut self) -> Self {
        self.available = true;
        self
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(r#"<a class="inner-table-sections specifications""#);
        if let Some(link) = &self.link {
            let _ = write!(out, r#" data-post-link="{}""#, escape(link));
        }
        out.push('>');
        let _ = write!(out, r#"<span class="title-name">{}</span>"#, escape(&self.title));
        if let Some(published) = &self.published {
            let _ = write!(out, r#"<span class="published">{}</span>"#, escape(published));
        }
        for (class, value) in [
            ("spec-cat", &self.doc_type),
            ("tech-cat", &self.tech),
            ("version", &self.version),
        ] {
            if let Some(value) = value {
                let _ = write!(out, r#"<span class="{class}">{}</span>"#, escape(value));
            }
        }
        if self.available {
            out.push_str(r#"<span class="available-download">Download</span>"#);
        }
        out.push_str("</a>\n");
    }
}

/// A whole listing page.
#[derive(Debug, Clone, Default)]
pub struct ListingFixture {
    rows: Vec<RowFixture>,
    next: NextFixture,
    page_label: Option<String>,
    cookie_banner: bool,
    without_container: bool,
}

impl ListingFixture {
    /// An empty listing page without a next control.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page whose rows carry the given dates; links are
    /// `https://emvco.test/{prefix}-{index}`.
    #[must_use]
    pub fn dated(prefix: &str, dates: &[&str]) -> Self {
        dates.iter().enumerate().fold(Self::new(), |page, (i, date)| {
            page.row(RowFixture::new(
                format!("{prefix} document {i}"),
                format!("https://emvco.test/{prefix}-{i}"),
                *date,
            ))
        })
    }

    /// Appends a row.
    #[must_use]
    pub fn row(mut self, row: RowFixture) -> Self {
        self.rows.push(row);
        self
    }

    /// Sets the next control.
    #[must_use]
    pub fn next(mut self, next: NextFixture) -> Self {
        self.next = next;
        self
    }

    /// Sets the current-page label.
    #[must_use]
    pub fn page_label(mut self, label: impl Into<String>) -> Self {
        self.page_label = Some(label.into());
        self
    }

    /// Adds a cookie banner with an "Accept" button.
    #[must_use]
    pub fn cookie_banner(mut self) -> Self {
        self.cookie_banner = true;
        self
    }

    /// Renders the rows without the listing container.
    #[must_use]
    pub fn without_container(mut self) -> Self {
        self.without_container = true;
        self
    }

    /// Renders the page.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html><head><title>Specifications</title></head><body>\n");
        if self.cookie_banner {
            out.push_str(
                r#"<div class="cookie-dialog"><button class="ui-button">Settings</button><button class="ui-button">Accept</button></div>"#,
            );
            out.push('\n');
        }

        if self.without_container {
            out.push_str("<div class=\"results\">\n");
        } else {
            out.push_str("<div id=\"filterable_search_results\">\n");
        }
        for row in &self.rows {
            row.render_into(&mut out);
        }
        out.push_str("</div>\n<div class=\"pagination\">");

        if let Some(label) = &self.page_label {
            let _ = write!(out, r#"<span id="current_page">{}</span>"#, escape(label));
        }
        match &self.next {
            NextFixture::Absent => {}
            NextFixture::Link(href) => {
                let _ = write!(out, r#"<a class="arrow" data-direction="next" href="{}">Next</a>"#, escape(href));
            }
            NextFixture::Script => {
                out.push_str(r##"<a class="arrow" data-direction="next" href="#">Next</a>"##);
            }
            NextFixture::Hidden => {
                out.push_str(r##"<a class="arrow" data-direction="next" href="#" style="display: none;">Next</a>"##);
            }
            NextFixture::Disabled => {
                out.push_str(r##"<a class="arrow disabled" data-direction="next" href="#">Next</a>"##);
            }
        }
        out.push_str("</div>\n</body></html>\n");
        out
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_rows_and_control() {
        let html = ListingFixture::dated("p1", &["2025-03-01", "2025-02-15"])
            .next(NextFixture::Script)
            .page_label("1")
            .render();
        assert!(html.contains(r#"data-post-link="https://emvco.test/p1-1""#));
        assert!(html.contains(r#"data-direction="next""#));
        assert!(html.contains(r#"<span id="current_page">1</span>"#));
    }

    #[test]
    fn test_escape() {
        let html = ListingFixture::new()
            .row(RowFixture::new("A & B <draft>", "/x?a=1&b=2", "2025-01-01"))
            .render();
        assert!(html.contains("A &amp; B &lt;draft&gt;"));
        assert!(html.contains("/x?a=1&amp;b=2"));
    }
}
