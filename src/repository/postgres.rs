//! PostgreSQL document store.
//!
//! Each document lives in a JSONB column. The identifier is kept outside the
//! document, either in `oid` (generated ids) or in `legacy_id` (integer ids),
//! and injected back under `_id` when documents are read.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, Pool, Postgres, Row};

use super::{
    document_id, expect_object, set_document_id, DocumentStore, Filter, UpdateResult,
};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{document::ID_KEY, Document, ObjectId, RecordId},
};

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

/// Split an id into the (oid, legacy_id) column pair
fn key_columns(id: &RecordId) -> (Option<String>, Option<i64>) {
    match id {
        RecordId::Generated(oid) => (Some(oid.to_hex()), None),
        RecordId::Legacy(n) => (None, Some(*n)),
    }
}

impl PgDocumentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect, then bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;
        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations completed");

        Ok(Self::new(pool))
    }

    fn row_to_document(row: &sqlx::postgres::PgRow) -> AppResult<Document> {
        let oid: Option<String> = row.try_get("oid")?;
        let legacy_id: Option<i64> = row.try_get("legacy_id")?;
        let Json(value): Json<Value> = row.try_get("doc")?;

        let id = match (oid, legacy_id) {
            (Some(hex), _) => RecordId::Generated(hex.parse::<ObjectId>()?),
            (None, Some(n)) => RecordId::Legacy(n),
            (None, None) => return Err(AppError::Store("Row without identifier".to_string())),
        };
        let mut doc = expect_object(value)?;
        set_document_id(&mut doc, &id)?;
        Ok(doc)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(&self, mut doc: Document) -> AppResult<RecordId> {
        let id = match doc.remove(ID_KEY) {
            Some(value) => {
                let mut keyed = Document::new();
                keyed.insert(ID_KEY.to_string(), value);
                document_id(&keyed).ok_or_else(|| {
                    AppError::BadRequest(
                        "Document _id is neither an object id nor an integer".to_string(),
                    )
                })?
            }
            None => RecordId::Generated(ObjectId::new()),
        };
        let (oid, legacy_id) = key_columns(&id);

        sqlx::query("INSERT INTO ouvrages (oid, legacy_id, doc) VALUES ($1, $2, $3)")
            .bind(oid)
            .bind(legacy_id)
            .bind(Json(Value::Object(doc)))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find_one(&self, id: &RecordId) -> AppResult<Option<Document>> {
        let (oid, legacy_id) = key_columns(id);
        let row = sqlx::query(
            "SELECT oid, legacy_id, doc FROM ouvrages WHERE oid = $1 OR legacy_id = $2 LIMIT 1",
        )
        .bind(oid)
        .bind(legacy_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn find(&self, filter: &Filter) -> AppResult<Vec<Document>> {
        let (oid, legacy_id) = match &filter.id {
            Some(id) => key_columns(id),
            None => (None, None),
        };
        let rows = sqlx::query(
            r#"
            SELECT oid, legacy_id, doc
            FROM ouvrages
            WHERE ($1::text IS NULL OR doc->>'type' = $1)
              AND ($2::text IS NULL OR oid = $2)
              AND ($3::bigint IS NULL OR legacy_id = $3)
            ORDER BY seq
            "#,
        )
        .bind(filter.record_type.map(|t| t.document_tag()))
        .bind(oid)
        .bind(legacy_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_document).collect()
    }

    async fn update_one(&self, id: &RecordId, mut set: Document) -> AppResult<UpdateResult> {
        set.remove(ID_KEY);
        let (oid, legacy_id) = key_columns(id);
        let modified: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE ouvrages o
            SET doc = o.doc || $1
            FROM (
                SELECT seq, doc FROM ouvrages
                WHERE oid = $2 OR legacy_id = $3
                LIMIT 1
                FOR UPDATE
            ) prev
            WHERE o.seq = prev.seq
            RETURNING prev.doc IS DISTINCT FROM o.doc
            "#,
        )
        .bind(Json(Value::Object(set)))
        .bind(oid)
        .bind(legacy_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match modified {
            Some(changed) => UpdateResult {
                matched: 1,
                modified: u64::from(changed),
            },
            None => UpdateResult::default(),
        })
    }

    async fn delete_one(&self, id: &RecordId) -> AppResult<u64> {
        let (oid, legacy_id) = key_columns(id);
        let result = sqlx::query(
            r#"
            DELETE FROM ouvrages
            WHERE seq = (SELECT seq FROM ouvrages WHERE oid = $1 OR legacy_id = $2 LIMIT 1)
            "#,
        )
        .bind(oid)
        .bind(legacy_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
