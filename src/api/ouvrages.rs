//! Catalog record endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Form, Json,
};

use crate::{
    error::AppResult,
    models::{NewRecord, Record, RecordForm, RecordId, RecordPatch, RecordQuery, WriteOutcome},
};

/// List records, optionally filtered by type
#[utoipa::path(
    get,
    path = "/ouvrages",
    tag = "ouvrages",
    params(RecordQuery),
    responses(
        (status = 200, description = "List of records", body = Vec<Record>)
    )
)]
pub async fn list_records(
    State(state): State<crate::AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<Json<Vec<Record>>> {
    let records = state.services.catalog.list_records(query.record_type).await?;
    Ok(Json(records))
}

/// Get a record by id
#[utoipa::path(
    get,
    path = "/ouvrages/{id}",
    tag = "ouvrages",
    params(
        ("id" = String, Path, description = "Generated id (24 hex characters) or legacy integer id")
    ),
    responses(
        (status = 200, description = "Record details", body = Record),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Record>> {
    let id = RecordId::resolve(&id)?;
    let record = state.services.catalog.get_record(&id).await?;
    Ok(Json(record))
}

/// Create a new record
#[utoipa::path(
    post,
    path = "/ouvrages",
    tag = "ouvrages",
    request_body = NewRecord,
    responses(
        (status = 201, description = "Record created", body = Record),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_record(
    State(state): State<crate::AppState>,
    Json(record): Json<NewRecord>,
) -> AppResult<(StatusCode, Json<Record>)> {
    let created = state.services.catalog.create_record(record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Create a new record from a url-encoded form
#[utoipa::path(
    post,
    path = "/ouvrages/form",
    tag = "ouvrages",
    request_body(content = RecordForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Record created", body = Record),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_record_from_form(
    State(state): State<crate::AppState>,
    Form(form): Form<RecordForm>,
) -> AppResult<(StatusCode, Json<Record>)> {
    let created = state.services.catalog.create_record(form.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update the given fields of a record
#[utoipa::path(
    put,
    path = "/ouvrages/{id}",
    tag = "ouvrages",
    params(
        ("id" = String, Path, description = "Generated id (24 hex characters) or legacy integer id")
    ),
    request_body = RecordPatch,
    responses(
        (status = 200, description = "Update outcome, affected = 0 when no record matched", body = WriteOutcome),
        (status = 400, description = "Malformed id or details of the wrong type")
    )
)]
pub async fn update_record(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RecordPatch>,
) -> AppResult<Json<WriteOutcome>> {
    let id = RecordId::resolve(&id)?;
    let outcome = state.services.catalog.update_record(&id, patch).await?;
    Ok(Json(outcome))
}

/// Delete a record
#[utoipa::path(
    delete,
    path = "/ouvrages/{id}",
    tag = "ouvrages",
    params(
        ("id" = String, Path, description = "Generated id (24 hex characters) or legacy integer id")
    ),
    responses(
        (status = 200, description = "Delete outcome, affected = 0 when no record matched", body = WriteOutcome),
        (status = 400, description = "Malformed id")
    )
)]
pub async fn delete_record(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<WriteOutcome>> {
    let id = RecordId::resolve(&id)?;
    let outcome = state.services.catalog.delete_record(&id).await?;
    Ok(Json(outcome))
}
