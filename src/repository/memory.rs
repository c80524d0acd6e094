//! In-memory document store

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{document_id, set_document_id, DocumentStore, Filter, UpdateResult};
use crate::{
    error::{AppError, AppResult},
    models::{document::ID_KEY, Document, ObjectId, RecordId},
};

/// Documents kept in insertion order behind a lock
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> AppResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, Vec<Document>>> {
        self.documents
            .read()
            .map_err(|_| AppError::Store("memory store lock poisoned (read)".to_string()))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, Vec<Document>>> {
        self.documents
            .write()
            .map_err(|_| AppError::Store("memory store lock poisoned (write)".to_string()))
    }
}

fn position(documents: &[Document], id: &RecordId) -> Option<usize> {
    documents
        .iter()
        .position(|doc| document_id(doc).as_ref() == Some(id))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, mut doc: Document) -> AppResult<RecordId> {
        let id = match doc.get(ID_KEY) {
            Some(_) => document_id(&doc).ok_or_else(|| {
                AppError::BadRequest("Document _id is neither an object id nor an integer".to_string())
            })?,
            None => RecordId::Generated(ObjectId::new()),
        };
        set_document_id(&mut doc, &id)?;

        let mut documents = self.write()?;
        if position(&documents, &id).is_some() {
            return Err(AppError::Store(format!("Duplicate key: {}", id)));
        }
        documents.push(doc);
        Ok(id)
    }

    async fn find_one(&self, id: &RecordId) -> AppResult<Option<Document>> {
        let documents = self.read()?;
        Ok(position(&documents, id).map(|i| documents[i].clone()))
    }

    async fn find(&self, filter: &Filter) -> AppResult<Vec<Document>> {
        let documents = self.read()?;
        Ok(documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    async fn update_one(&self, id: &RecordId, set: Document) -> AppResult<UpdateResult> {
        let mut documents = self.write()?;
        let Some(i) = position(&documents, id) else {
            return Ok(UpdateResult::default());
        };
        let doc = &mut documents[i];
        let mut modified = false;
        for (key, value) in set {
            if key == ID_KEY {
                continue;
            }
            if doc.get(&key) != Some(&value) {
                doc.insert(key, value);
                modified = true;
            }
        }
        Ok(UpdateResult {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_one(&self, id: &RecordId) -> AppResult<u64> {
        let mut documents = self.write()?;
        match position(&documents, id) {
            Some(i) => {
                documents.remove(i);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> AppResult<()> {
        self.read().map(|_| ())
    }

    async fn close(&self) {}
}
