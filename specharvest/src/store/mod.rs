//! In-memory identity index and document sink.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::core::SpecDocument;
use crate::crawl::{DocumentSink, IdentityIndex};
use crate::errors::CrawlError;
use crate::utils::now_utc;
use uuid::Uuid;

/// Keeps registered identities and stored documents in process memory.
///
/// Emitting a document registers its identity, so a second crawl over the
/// same store sees every earlier document as known. Cloning shares the
/// underlying storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    identities: Arc<DashMap<String, Uuid>>,
    documents: Arc<Mutex<Vec<SpecDocument>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with identities already registered.
    #[must_use]
    pub fn with_known<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for identity in identities {
            store.register(identity);
        }
        store
    }

    /// Registers an identity without storing a document.
    pub fn register(&self, identity: impl Into<String>) {
        self.identities.insert(identity.into(), Uuid::now_v7());
    }

    /// Whether an identity is registered.
    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.identities.contains_key(identity)
    }

    /// Stored documents in emission order.
    #[must_use]
    pub fn documents(&self) -> Vec<SpecDocument> {
        self.documents.lock().clone()
    }

    /// Links of the stored documents in emission order.
    #[must_use]
    pub fn links(&self) -> Vec<String> {
        self.documents.lock().iter().map(|d| d.link.clone()).collect()
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }

    /// Number of registered identities.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.identities.len()
    }
}

#[async_trait]
impl IdentityIndex for MemoryStore {
    async fn is_known(&self, identity: &str) -> Result<bool, CrawlError> {
        Ok(self.contains(identity))
    }
}

#[async_trait]
impl DocumentSink for MemoryStore {
    async fn emit(&self, mut document: SpecDocument) -> Result<(), CrawlError> {
        let id = Uuid::now_v7();
        if self
            .identities
            .insert(document.identity().to_string(), id)
            .is_some()
        {
            return Err(CrawlError::Sink(format!(
                "document `{}` is already registered",
                document.link
            )));
        }

        document.id = Some(id);
        document.loaded = Some(now_utc());
        debug!(link = %document.link, id = %id, "Stored document");
        self.documents.lock().push(document);
        Ok(())
    }
}
