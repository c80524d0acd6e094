//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::{NewRecord, Record, RecordId, RecordPatch, TypeFilter, WriteOutcome},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List records of the given type (all by default)
    pub async fn list_records(&self, filter: TypeFilter) -> AppResult<Vec<Record>> {
        self.repository.ouvrages_list(filter).await
    }

    /// Get a record by id
    pub async fn get_record(&self, id: &RecordId) -> AppResult<Record> {
        self.repository
            .ouvrages_get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))
    }

    /// Create a new record. Empty titles and detail fields are accepted.
    pub async fn create_record(&self, record: NewRecord) -> AppResult<Record> {
        record.validate()?;
        let created = self.repository.ouvrages_insert(record).await?;
        tracing::info!(
            "Catalog create: {} {} \"{}\"",
            created.record_type(),
            created.id,
            created.title
        );
        Ok(created)
    }

    /// Apply a partial update. An unknown id is not an error; the outcome
    /// reports that nothing matched.
    pub async fn update_record(&self, id: &RecordId, patch: RecordPatch) -> AppResult<WriteOutcome> {
        let Some(record_type) = self.repository.ouvrages_type(id).await? else {
            tracing::info!("Catalog update: no record {}", id);
            return Ok(WriteOutcome::updated(0, 0));
        };
        patch.validate_for(record_type)?;

        let result = self.repository.ouvrages_update(id, &patch).await?;
        tracing::info!(
            "Catalog update: record {} matched={} modified={}",
            id,
            result.matched,
            result.modified
        );
        Ok(WriteOutcome::updated(result.matched, result.modified))
    }

    /// Delete a record. An unknown id is not an error.
    pub async fn delete_record(&self, id: &RecordId) -> AppResult<WriteOutcome> {
        let deleted = self.repository.ouvrages_delete(id).await?;
        tracing::info!("Catalog delete: record {} deleted={}", id, deleted);
        Ok(WriteOutcome::deleted(deleted))
    }
}
