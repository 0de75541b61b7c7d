//! Candidate records parsed from listing rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder stored for optional fields that could not be extracted.
pub const PLACEHOLDER: &str = " ";

/// One row parsed from a listing page, before filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Document title.
    pub title: String,
    /// Link to the document; also its identity.
    pub link: String,
    /// Publication date, if the row's date text could be parsed.
    pub published: Option<DateTime<Utc>>,
    /// Whether the document is available for download.
    #[serde(default)]
    pub available: bool,
    /// Document type (specification category).
    #[serde(default = "placeholder")]
    pub doc_type: String,
    /// Technology category.
    #[serde(default = "placeholder")]
    pub tech_category: String,
    /// Document version.
    #[serde(default = "placeholder")]
    pub version: String,
}

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

impl CandidateRecord {
    /// Creates a record with the required fields; optional fields take the
    /// placeholder.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        published: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published,
            available: false,
            doc_type: placeholder(),
            tech_category: placeholder(),
            version: placeholder(),
        }
    }

    /// Sets the availability flag.
    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Sets the document type.
    #[must_use]
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    /// Sets the technology category.
    #[must_use]
    pub fn with_tech_category(mut self, tech: impl Into<String>) -> Self {
        self.tech_category = tech.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// The key used for novelty checks.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.link
    }

    /// Whether the record carries a parsed publication date.
    #[must_use]
    pub fn is_dated(&self) -> bool {
        self.published.is_some()
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut dict = HashMap::new();
        dict.insert("title".to_string(), serde_json::json!(self.title));
        dict.insert("link".to_string(), serde_json::json!(self.link));
        dict.insert(
            "published".to_string(),
            serde_json::json!(self.published.map(|p| p.to_rfc3339())),
        );
        dict.insert("available".to_string(), serde_json::json!(self.available));
        dict.insert("doc_type".to_string(), serde_json::json!(self.doc_type));
        dict.insert("tech_category".to_string(), serde_json::json!(self.tech_category));
        dict.insert("version".to_string(), serde_json::json!(self.version));
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_uses_placeholders() {
        let record = CandidateRecord::new("EMV Book 1", "https://example.com/b1", None);
        assert_eq!(record.doc_type, PLACEHOLDER);
        assert_eq!(record.tech_category, PLACEHOLDER);
        assert_eq!(record.version, PLACEHOLDER);
        assert!(!record.available);
        assert!(!record.is_dated());
        assert_eq!(record.identity(), "https://example.com/b1");
    }

    #[test]
    fn test_builder() {
        let published = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let record = CandidateRecord::new("Contactless Kernel", "/specs/c8", Some(published))
            .with_available(true)
            .with_doc_type("Specification")
            .with_tech_category("Contactless")
            .with_version("v1.1");

        assert!(record.is_dated());
        assert!(record.available);
        assert_eq!(record.version, "v1.1");

        let dict = record.to_dict();
        assert_eq!(dict.get("tech_category").unwrap(), "Contactless");
        assert_eq!(dict.get("published").unwrap(), "2025-03-01T00:00:00+00:00");
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let record: CandidateRecord = serde_json::from_str(
            r#"{"title": "T", "link": "/l", "published": null}"#,
        )
        .unwrap();
        assert_eq!(record.version, PLACEHOLDER);
        assert!(!record.available);
    }
}
