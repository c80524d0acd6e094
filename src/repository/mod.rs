//! Repository layer: the document store contract and its backends

pub mod memory;
pub mod ouvrages;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    config::{AppConfig, StoreBackend},
    error::AppResult,
    models::{
        document::{document_type, Document, ID_KEY},
        RecordId, RecordType,
    },
};

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Equality filter on `_id` and `type`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub id: Option<RecordId>,
    pub record_type: Option<RecordType>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: RecordId) -> Self {
        Self {
            id: Some(id),
            record_type: None,
        }
    }

    pub fn by_type(record_type: Option<RecordType>) -> Self {
        Self {
            id: None,
            record_type,
        }
    }

    /// Whether a stored document (with its `_id`) passes the filter
    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(id) = &self.id {
            if document_id(doc).as_ref() != Some(id) {
                return false;
            }
        }
        if let Some(record_type) = self.record_type {
            if document_type(doc) != Some(record_type) {
                return false;
            }
        }
        true
    }
}

/// Outcome of a single-document update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
}

/// Identifier stored under `_id`, if any
pub fn document_id(doc: &Document) -> Option<RecordId> {
    doc.get(ID_KEY)
        .and_then(|v| serde_json::from_value::<RecordId>(v.clone()).ok())
}

/// Put `id` under `_id`
pub fn set_document_id(doc: &mut Document, id: &RecordId) -> AppResult<()> {
    doc.insert(ID_KEY.to_string(), serde_json::to_value(id)?);
    Ok(())
}

/// A collection of JSON documents keyed by [`RecordId`].
///
/// Documents returned by the store always carry their `_id`. Updates
/// overwrite top-level keys only and never touch `_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert one document. A document without `_id` gets a generated one.
    async fn insert_one(&self, doc: Document) -> AppResult<RecordId>;

    async fn find_one(&self, id: &RecordId) -> AppResult<Option<Document>>;

    /// All documents passing `filter`, in insertion order
    async fn find(&self, filter: &Filter) -> AppResult<Vec<Document>>;

    /// Overwrite the keys of `set` on the document matching `id`
    async fn update_one(&self, id: &RecordId, set: Document) -> AppResult<UpdateResult>;

    /// Remove the document matching `id`; returns how many were removed
    async fn delete_one(&self, id: &RecordId) -> AppResult<u64>;

    /// Check that the backend answers
    async fn ping(&self) -> AppResult<()>;

    /// Release backend resources
    async fn close(&self);
}

/// Repository over the `ouvrages` collection
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    /// Create a new repository over an opened store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

/// Open the store backend selected in the configuration
pub async fn open_store(config: &AppConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config.store.backend {
        StoreBackend::Postgres => {
            let store = PgDocumentStore::connect(&config.database).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store: records are lost on shutdown");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}

pub(crate) fn expect_object(value: Value) -> AppResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(crate::error::AppError::Store(format!(
            "Stored document is not an object: {}",
            other
        ))),
    }
}
