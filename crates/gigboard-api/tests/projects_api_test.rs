//! End-to-end tests for the project API over a real listener.
//!
//! Each test spawns its own server on an ephemeral port with a fresh
//! temporary store, then drives it with reqwest.

use std::sync::Arc;

use gigboard_api::{build_router, AppState};
use gigboard_store::JsonFileStore;
use tempfile::TempDir;

/// Build a server over a fresh store and return its base URL.
async fn spawn_server(dir: &TempDir) -> String {
    let store = JsonFileStore::new(
        dir.path().join("projects.json"),
        dir.path().join("db.json"),
    );
    store.initialize().await.unwrap();

    let state = AppState {
        store: Arc::new(store),
        static_dir: dir.path().join("public"),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn list_projects(base_url: &str) -> Vec<serde_json::Value> {
    let body: serde_json::Value = reqwest::get(format!("{}/api/projects", base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
    body["projects"].as_array().unwrap().clone()
}

#[tokio::test]
async fn test_list_returns_sample_projects() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;

    let projects = list_projects(&base_url).await;

    assert_eq!(projects.len(), 3);
    assert_eq!(projects[0]["title"], "Token sale smart contract");
}

#[tokio::test]
async fn test_create_returns_created_project() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let before = chrono::Utc::now().timestamp_millis();
    let response = client
        .post(format!("{}/api/projects", base_url))
        .json(&serde_json::json!({ "title": "Fix bug", "desc": "Patch the thing" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);

    let project = &body["project"];
    assert!(!project["id"].as_str().unwrap().is_empty());
    assert_eq!(project["title"], "Fix bug");
    assert_eq!(project["budget"], "");
    assert_eq!(project["skills"], "");
    assert!(project["owner"].is_null());
    let created = project["created"].as_i64().unwrap();
    assert!(created >= before && created <= before + 60_000);

    // New record sits at the front of the list.
    let projects = list_projects(&base_url).await;
    assert_eq!(projects.len(), 4);
    assert_eq!(projects[0]["title"], "Fix bug");
}

#[tokio::test]
async fn test_create_with_blank_title_is_rejected() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/projects", base_url))
        .json(&serde_json::json!({ "title": "", "desc": "x" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());

    // Store unchanged.
    assert_eq!(list_projects(&base_url).await.len(), 3);
}

#[tokio::test]
async fn test_create_with_malformed_json_is_rejected() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/projects", base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_create_with_non_object_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/projects", base_url))
        .json(&serde_json::json!(["not", "an", "object"]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_create_coerces_non_string_fields() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/projects", base_url))
        .json(&serde_json::json!({ "title": "T", "desc": "D", "budget": 42 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["project"]["budget"], "42");
}

#[tokio::test]
async fn test_delete_unknown_id_returns_404() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let response = client
        .delete(format!("{}/api/projects/no-such-id", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert_eq!(list_projects(&base_url).await.len(), 3);
}

#[tokio::test]
async fn test_delete_existing_id_removes_it() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let projects = list_projects(&base_url).await;
    let target = projects[1]["id"].as_str().unwrap().to_string();

    let response = client
        .delete(format!("{}/api/projects/{}", base_url, target))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["id"], target.as_str());

    let remaining = list_projects(&base_url).await;
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|p| p["id"] != target.as_str()));
    // Order of the survivors is unchanged.
    assert_eq!(remaining[0]["id"], projects[0]["id"]);
    assert_eq!(remaining[1]["id"], projects[2]["id"]);
}

#[tokio::test]
async fn test_reset_restores_sample_dataset() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/api/projects", base_url))
        .json(&serde_json::json!({ "title": "Scratch", "desc": "d" }))
        .send()
        .await
        .unwrap();
    assert_eq!(list_projects(&base_url).await.len(), 4);

    let response = client
        .post(format!("{}/api/reset", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert_eq!(list_projects(&base_url).await.len(), 3);
}

#[tokio::test]
async fn test_health_reports_record_count() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;

    let body: serde_json::Value = reqwest::get(format!("{}/api/health", base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["projects"], 3);
}

#[tokio::test]
async fn test_unknown_api_path_returns_json_404() {
    let dir = TempDir::new().unwrap();
    let base_url = spawn_server(&dir).await;

    let response = reqwest::get(format!("{}/api/nothing-here", base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
}
