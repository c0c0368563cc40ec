//! Document fetch hook for search record types.
//!
//! The search subsystem hands a record type the GUIDs matched by the index
//! and asks it for displayable documents. The base behaviour is a no-op;
//! record types backed by a live index override it.
//!
//! ```text
//! search query ──▶ index (Sphinx) ──▶ GUIDs ──▶ SearchRecordType::get_documents
//!                                                      │
//!                                                      ▼
//!                                               SearchBackend::fetch
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::record_type::RecordType;

/// A search hit resolved back to a forum record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchDocument {
    pub guid: i64,
    pub record_type: String,
    pub record_id: i64,
    pub title: String,
    pub url: String,
    pub body: String,
}

/// The external search index.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Fetch stored documents for `guids` from the index named `index`.
    ///
    /// Unknown GUIDs are skipped, not reported.
    async fn fetch(&self, index: &str, guids: &[i64]) -> Result<Vec<SearchDocument>>;
}

/// The capability every search record type exposes to the search subsystem.
#[async_trait]
pub trait SearchRecordType: Send + Sync {
    fn descriptor(&self) -> &RecordType;

    /// Resolve `ids` into documents. Returns nothing unless overridden.
    async fn get_documents(
        &self,
        _ids: &[i64],
        _backend: &dyn SearchBackend,
    ) -> Result<Vec<SearchDocument>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl SearchRecordType for RecordType {
    fn descriptor(&self) -> &RecordType {
        self
    }
}

/// A record type whose documents live in its search index.
///
/// `ids` are record IDs; they are encoded to GUIDs before hitting the
/// backend. Suppressed indexes yield no documents.
#[derive(Debug, Clone)]
pub struct IndexedRecordType {
    record_type: RecordType,
}

impl IndexedRecordType {
    pub fn new(record_type: RecordType) -> Self {
        Self { record_type }
    }
}

#[async_trait]
impl SearchRecordType for IndexedRecordType {
    fn descriptor(&self) -> &RecordType {
        &self.record_type
    }

    async fn get_documents(
        &self,
        ids: &[i64],
        backend: &dyn SearchBackend,
    ) -> Result<Vec<SearchDocument>> {
        let index = self.record_type.index_name();
        if index.is_empty() || ids.is_empty() {
            return Ok(Vec::new());
        }
        let guids: Vec<i64> = ids
            .iter()
            .filter_map(|id| self.record_type.guid(*id))
            .collect();
        backend.fetch(index, &guids).await
    }
}

/// In-memory [`SearchBackend`] for tests and demos.
#[derive(Default)]
pub struct InMemoryBackend {
    indexes: RwLock<HashMap<String, HashMap<i64, SearchDocument>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, index: &str, doc: SearchDocument) {
        let mut indexes = self.indexes.write().unwrap();
        indexes
            .entry(index.to_string())
            .or_default()
            .insert(doc.guid, doc);
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn fetch(&self, index: &str, guids: &[i64]) -> Result<Vec<SearchDocument>> {
        let indexes = self.indexes.read().unwrap();
        let Some(docs) = indexes.get(index) else {
            return Ok(Vec::new());
        };
        Ok(guids.iter().filter_map(|g| docs.get(g).cloned()).collect())
    }
}
