//! Catalog record methods on Repository

use super::{Filter, Repository, UpdateResult};
use crate::{
    error::{AppError, AppResult},
    models::{
        document::{document_type, new_document, patch_document, record_from_document},
        NewRecord, Record, RecordId, RecordPatch, RecordType, TypeFilter,
    },
};

impl Repository {
    /// Insert a record; the store assigns its id
    pub async fn ouvrages_insert(&self, record: NewRecord) -> AppResult<Record> {
        let doc = new_document(record.clone())?;
        let id = self.store.insert_one(doc).await?;
        Ok(record.into_record(id))
    }

    /// Get a record by id
    pub async fn ouvrages_get(&self, id: &RecordId) -> AppResult<Option<Record>> {
        self.store
            .find_one(id)
            .await?
            .map(record_from_document)
            .transpose()
    }

    /// Type of a stored record, read from its `type` tag only so that a
    /// record with damaged details can still be patched.
    /// `None` when no record has this id.
    pub async fn ouvrages_type(&self, id: &RecordId) -> AppResult<Option<RecordType>> {
        let Some(doc) = self.store.find_one(id).await? else {
            return Ok(None);
        };
        document_type(&doc).map(Some).ok_or_else(|| {
            AppError::Validation(format!("Record {} has no known type", id))
        })
    }

    /// List records, optionally of one type, in store order
    pub async fn ouvrages_list(&self, filter: TypeFilter) -> AppResult<Vec<Record>> {
        self.store
            .find(&Filter::by_type(filter.record_type()))
            .await?
            .into_iter()
            .map(record_from_document)
            .collect()
    }

    /// Overwrite the patched fields of one record
    pub async fn ouvrages_update(&self, id: &RecordId, patch: &RecordPatch) -> AppResult<UpdateResult> {
        let set = patch_document(patch)?;
        if set.is_empty() {
            let matched = self.store.find_one(id).await?.map_or(0, |_| 1);
            return Ok(UpdateResult { matched, modified: 0 });
        }
        self.store.update_one(id, set).await
    }

    /// Delete one record
    pub async fn ouvrages_delete(&self, id: &RecordId) -> AppResult<u64> {
        self.store.delete_one(id).await
    }
}
