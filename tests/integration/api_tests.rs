//! API tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_record_lifecycle() {
    let client = Client::new();

    let response = client
        .post(format!("{}/ouvrages", BASE_URL))
        .json(&json!({
            "title": "L'Étranger",
            "available": true,
            "type": "book",
            "details": {"year": 1942, "publisher": "Gallimard", "author": "Albert Camus"},
            "copies": ["E1", "E2"]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_str().expect("No id in response").to_string();

    let response = client
        .put(format!("{}/ouvrages/{}", BASE_URL, id))
        .json(&json!({"title": "L'Étranger (poche)"}))
        .send()
        .await
        .expect("Failed to send request");
    let outcome: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(outcome["affected"], 1);

    let response = client
        .get(format!("{}/ouvrages?type=books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let books: Value = response.json().await.expect("Failed to parse response");
    assert!(books
        .as_array()
        .expect("Expected an array")
        .iter()
        .any(|b| b["id"] == id.as_str() && b["title"] == "L'Étranger (poche)"));

    let response = client
        .delete(format!("{}/ouvrages/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    let outcome: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(outcome["affected"], 1);
}

#[tokio::test]
#[ignore]
async fn test_delete_unknown_record() {
    let client = Client::new();

    let response = client
        .delete(format!("{}/ouvrages/{}", BASE_URL, "000000000000000000000000"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let outcome: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(outcome["affected"], 0);
}
