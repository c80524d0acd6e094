//! In-process tests of the HTTP API over the in-memory store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ouvrages_server::{
    api::create_router,
    models::Document,
    repository::{DocumentStore, MemoryDocumentStore},
    AppConfig, AppState,
};

fn app() -> (Router, MemoryDocumentStore) {
    let store = MemoryDocumentStore::new();
    let state = AppState::new(AppConfig::in_memory(), Arc::new(store.clone()));
    (create_router(state), store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn book_body() -> Value {
    json!({
        "title": "Le Petit Prince",
        "available": true,
        "type": "book",
        "details": {"year": 1943, "publisher": "Reynal & Hitchcock", "author": "Antoine de Saint-Exupéry"},
        "copies": ["A", "B", "C"]
    })
}

#[tokio::test]
async fn test_health_and_ready() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_create_then_list_books() {
    let (app, _) = app();
    let (status, created) = send(&app, Method::POST, "/api/v1/ouvrages", Some(book_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"].as_str().map(str::len), Some(24));

    let (status, books) = send(&app, Method::GET, "/api/v1/ouvrages?type=books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().unwrap().len(), 1);
    assert_eq!(books[0]["title"], "Le Petit Prince");
    assert_eq!(books[0]["details"]["year"], 1943);
    assert_eq!(books[0]["details"]["author"], "Antoine de Saint-Exupéry");
    assert_eq!(books[0]["details"]["publisher"], "Reynal & Hitchcock");
    assert_eq!(books[0]["copies"], json!(["A", "B", "C"]));

    let (_, periodicals) = send(&app, Method::GET, "/api/v1/ouvrages?type=periodicals", None).await;
    assert_eq!(periodicals, json!([]));
}

#[tokio::test]
async fn test_periodical_roundtrip() {
    let (app, _) = app();
    let body = json!({
        "title": "Science & Vie",
        "available": false,
        "type": "periodical",
        "details": {"date": "2024-03-01", "periodicity": "monthly"}
    });
    let (status, _) = send(&app, Method::POST, "/api/v1/ouvrages", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listed) = send(&app, Method::GET, "/api/v1/ouvrages?type=periodicals", None).await;
    assert_eq!(listed[0]["details"], json!({"date": "2024-03-01", "periodicity": "monthly"}));
    assert!(listed[0].get("copies").is_none());
}

#[tokio::test]
async fn test_form_create_splits_copies() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/ouvrages/form")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "title=Germinal&available=true&type=book&year=1985&publisher=Hachette&author=Zola&copies=A%2CB%2CC",
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let created: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(created["copies"], json!(["A", "B", "C"]));
    assert_eq!(created["details"]["year"], 1985);
}

async fn post_form(app: &Router, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/ouvrages/form")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_form_checkbox_semantics() {
    let (app, _) = app();

    let (status, checked) = post_form(&app, "title=A&available=on&type=book&year=1985").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(checked["available"], true);
    assert_eq!(checked["details"]["year"], 1985);

    let (status, unchecked) = post_form(&app, "title=B&type=book&year=1985").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(unchecked["available"], false);
}

#[tokio::test]
async fn test_form_empty_fields_use_defaults() {
    let (app, _) = app();

    let (status, book) = post_form(&app, "title=C&available=false&type=book&year=&publisher=&copies=").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["available"], false);
    assert_eq!(book["details"]["year"], 2000);
    assert_eq!(book["copies"], json!([""]));

    let (status, periodical) =
        post_form(&app, "title=D&available=on&type=periodical&date=2024-03-01&periodicity=").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(periodical["details"], json!({"date": "2024-03-01", "periodicity": "weekly"}));
}

#[tokio::test]
async fn test_damaged_legacy_book_does_not_break_listing() {
    let (app, store) = app();
    let (_, valid) = send(&app, Method::POST, "/api/v1/ouvrages", Some(book_body())).await;
    let damaged: Document = json!({
        "_id": 8,
        "titre": "Sans année",
        "dispo": 1,
        "type": "livres",
        "exemplaires": ["S-1"],
        "détails": {"edition": "E", "auteur": "A"}
    })
    .as_object()
    .unwrap()
    .clone();
    store.insert_one(damaged).await.unwrap();

    let (status, all) = send(&app, Method::GET, "/api/v1/ouvrages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["id"], valid["id"]);
    assert_eq!(all[1]["details"]["year"], 2000);

    let (status, outcome) = send(&app, Method::PUT, "/api/v1/ouvrages/8", Some(json!({"title": "t"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["affected"], 1);

    let (_, record) = send(&app, Method::GET, "/api/v1/ouvrages/8", None).await;
    assert_eq!(record["title"], "t");
    assert_eq!(record["copies"], json!(["S-1"]));
}

#[tokio::test]
async fn test_update_changes_only_title() {
    let (app, _) = app();
    let (_, created) = send(&app, Method::POST, "/api/v1/ouvrages", Some(book_body())).await;
    let uri = format!("/api/v1/ouvrages/{}", created["id"].as_str().unwrap());

    let (status, outcome) = send(&app, Method::PUT, &uri, Some(json!({"title": "Nouveau titre"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["matched"], 1);
    assert_eq!(outcome["affected"], 1);

    let (_, record) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(record["title"], "Nouveau titre");
    assert_eq!(record["details"], created["details"]);
    assert_eq!(record["available"], created["available"]);
    assert_eq!(record["type"], created["type"]);
    assert_eq!(record["copies"], created["copies"]);
}

#[tokio::test]
async fn test_update_wrong_kind_is_rejected() {
    let (app, _) = app();
    let (_, created) = send(&app, Method::POST, "/api/v1/ouvrages", Some(book_body())).await;
    let uri = format!("/api/v1/ouvrages/{}", created["id"].as_str().unwrap());

    let patch = json!({"details": {"date": "2024-03-01", "periodicity": "daily"}});
    let (status, error) = send(&app, Method::PUT, &uri, Some(patch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "BadValue");
}

#[tokio::test]
async fn test_delete_reports_affected_count() {
    let (app, _) = app();
    let (_, created) = send(&app, Method::POST, "/api/v1/ouvrages", Some(book_body())).await;
    let uri = format!("/api/v1/ouvrages/{}", created["id"].as_str().unwrap());

    let (status, outcome) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["affected"], 1);

    let (status, outcome) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["affected"], 0);
    assert_eq!(outcome["message"], "No record matched");

    let (_, all) = send(&app, Method::GET, "/api/v1/ouvrages", None).await;
    assert_eq!(all, json!([]));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_integer_ids() {
    let (app, store) = app();
    let doc: Document = json!({
        "_id": 7,
        "titre": "Notre-Dame de Paris",
        "dispo": 1,
        "type": "livres",
        "exemplaires": ["NDP-1"],
        "détails": {"année": 1998, "edition": "Pocket", "auteur": "Victor Hugo"}
    })
    .as_object()
    .unwrap()
    .clone();
    store.insert_one(doc).await.unwrap();

    let (status, record) = send(&app, Method::GET, "/api/v1/ouvrages/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["id"], 7);
    assert_eq!(record["details"]["author"], "Victor Hugo");

    let (_, outcome) = send(&app, Method::PUT, "/api/v1/ouvrages/7", Some(json!({"available": false}))).await;
    assert_eq!(outcome["affected"], 1);

    let (_, outcome) = send(&app, Method::DELETE, "/api/v1/ouvrages/7", None).await;
    assert_eq!(outcome["affected"], 1);
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let (app, _) = app();
    let (status, error) = send(&app, Method::DELETE, "/api/v1/ouvrages/not-a-number", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], 18);
}
