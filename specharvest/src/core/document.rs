//! The document shape handed to the downstream sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::record::CandidateRecord;

/// Listing-specific attributes carried alongside a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAttributes {
    /// Document type.
    pub doc_type: String,
    /// Technology category.
    pub tech: String,
    /// Version string.
    pub version: String,
    /// Whether the document can be downloaded.
    pub available: bool,
}

/// A document accepted by the crawl.
///
/// Storage fields (`id`, `storage`, `loaded`, `text`) stay empty here; the
/// sink that persists the document fills them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecDocument {
    /// Storage identifier, assigned downstream.
    pub id: Option<Uuid>,
    /// Title.
    pub title: String,
    /// Abstract, if any.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Body text, if loaded.
    pub text: Option<String>,
    /// Link to the document.
    pub link: String,
    /// Storage location, assigned downstream.
    pub storage: Option<String>,
    /// Listing attributes.
    pub other: DocumentAttributes,
    /// Publication date.
    pub published: Option<DateTime<Utc>>,
    /// When the document was loaded into storage.
    pub loaded: Option<DateTime<Utc>>,
    /// Reference of the source that produced the document.
    pub source: String,
}

impl SpecDocument {
    /// Builds a document from an accepted candidate.
    #[must_use]
    pub fn from_candidate(candidate: &CandidateRecord, source: impl Into<String>) -> Self {
        Self {
            id: None,
            title: candidate.title.clone(),
            abstract_text: None,
            text: None,
            link: candidate.link.clone(),
            storage: None,
            other: DocumentAttributes {
                doc_type: candidate.doc_type.clone(),
                tech: candidate.tech_category.clone(),
                version: candidate.version.clone(),
                available: candidate.available,
            },
            published: candidate.published,
            loaded: None,
            source: source.into(),
        }
    }

    /// The key used for identity registration.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.link
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut dict = HashMap::new();
        dict.insert("title".to_string(), serde_json::json!(self.title));
        dict.insert("link".to_string(), serde_json::json!(self.link));
        dict.insert("source".to_string(), serde_json::json!(self.source));
        dict.insert(
            "published".to_string(),
            serde_json::json!(self.published.map(|p| p.to_rfc3339())),
        );
        dict.insert(
            "other".to_string(),
            serde_json::json!({
                "doc_type": self.other.doc_type,
                "tech": self.other.tech,
                "version": self.other.version,
                "available": self.other.available,
            }),
        );
        dict
    }
}
