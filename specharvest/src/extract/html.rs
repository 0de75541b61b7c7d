//! HTML listing extractor backed by `scraper`.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::fields::{attribute_value, select_text};
use super::protocols::ListingExtractor;
use crate::config::ListingSelectors;
use crate::core::CandidateRecord;
use crate::errors::{CrawlError, MissingField};
use crate::utils::parse_published;

/// Compiles a configured selector, naming it in the error.
pub(crate) fn compile_selector(selector: &str) -> Result<Selector, CrawlError> {
    Selector::parse(selector).map_err(|e| CrawlError::selector(selector, format!("{e:?}")))
}

#[derive(Debug)]
struct CompiledSelectors {
    container: Selector,
    row: Selector,
    title: Selector,
    published: Selector,
    doc_type: Selector,
    tech_category: Selector,
    version: Selector,
    available: Selector,
}

impl CompiledSelectors {
    fn compile(config: &ListingSelectors) -> Result<Self, CrawlError> {
        Ok(Self {
            container: compile_selector(&config.container)?,
            row: compile_selector(&config.row)?,
            title: compile_selector(&config.title)?,
            published: compile_selector(&config.published)?,
            doc_type: compile_selector(&config.doc_type)?,
            tech_category: compile_selector(&config.tech_category)?,
            version: compile_selector(&config.version)?,
            available: compile_selector(&config.available)?,
        })
    }
}

/// Extracts candidate records from listing HTML.
#[derive(Debug)]
pub struct HtmlListingExtractor {
    config: ListingSelectors,
    selectors: CompiledSelectors,
}

impl HtmlListingExtractor {
    /// Creates an extractor, compiling every selector up front.
    pub fn new(config: ListingSelectors) -> Result<Self, CrawlError> {
        let selectors = CompiledSelectors::compile(&config)?;
        Ok(Self { config, selectors })
    }

    /// Creates an extractor for the default EMVCo layout.
    pub fn emvco() -> Result<Self, CrawlError> {
        Self::new(ListingSelectors::default())
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Result<CandidateRecord, MissingField> {
        let s = &self.selectors;

        let title = select_text(row, &s.title).required("title")?;
        let link = attribute_value(row, &self.config.link_attribute).required("link")?;
        let published_text = select_text(row, &s.published).required("published")?;

        let published = parse_published(&published_text);
        if published.is_none() {
            debug!(link = %link, text = %published_text, "Unparsable published date");
        }

        let doc_type = select_text(row, &s.doc_type);
        let tech_category = select_text(row, &s.tech_category);
        let version = select_text(row, &s.version);
        if !(doc_type.is_present() && tech_category.is_present() && version.is_present()) {
            debug!(
                link = %link,
                doc_type = doc_type.is_present(),
                tech_category = tech_category.is_present(),
                version = version.is_present(),
                "Optional fields missing, using placeholder"
            );
        }
        let available = row.select(&s.available).next().is_some();

        Ok(CandidateRecord::new(title, link, published)
            .with_available(available)
            .with_doc_type(doc_type.or_placeholder())
            .with_tech_category(tech_category.or_placeholder())
            .with_version(version.or_placeholder()))
    }
}

impl ListingExtractor for HtmlListingExtractor {
    fn extract(&self, html: &str) -> Vec<CandidateRecord> {
        let document = Html::parse_document(html);

        let Some(container) = document.select(&self.selectors.container).next() else {
            debug!(container = %self.config.container, "Listing container not found");
            return Vec::new();
        };

        let mut candidates = Vec::new();
        for (index, row) in container.select(&self.selectors.row).enumerate() {
            match self.parse_row(row) {
                Ok(candidate) => candidates.push(candidate),
                Err(missing) => {
                    warn!(row = index, field = missing.field, "Skipping listing row: {missing}");
                }
            }
        }
        candidates
    }

    fn config(&self) -> &ListingSelectors {
        &self.config
    }
}
