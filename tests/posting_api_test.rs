use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use posting_backend::{
    error::{Error, Result},
    middleware::cors::permissive_cors,
    models::posting::Posting,
    routes,
    store::{MemoryPostingStore, PostingStore},
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn setup_app() -> Router {
    app_with_store(Arc::new(MemoryPostingStore::new()), Duration::from_secs(5))
}

fn app_with_store(store: Arc<dyn PostingStore>, timeout: Duration) -> Router {
    routes::router(AppState::new(store, timeout), permissive_cors())
}

struct UnreachableStore;

#[async_trait]
impl PostingStore for UnreachableStore {
    async fn insert(&self, _posting: Posting) -> Result<Posting> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_all(&self) -> Result<Vec<Posting>> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }

    async fn search_by_text(&self, _query: &str) -> Result<Vec<Posting>> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }
}

struct StalledStore;

#[async_trait]
impl PostingStore for StalledStore {
    async fn insert(&self, posting: Posting) -> Result<Posting> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(posting)
    }

    async fn list_all(&self) -> Result<Vec<Posting>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }

    async fn search_by_text(&self, _query: &str) -> Result<Vec<Posting>> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }
}

fn post_request(body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/post")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn create(app: &Router, body: JsonValue) -> JsonValue {
    let (status, body) = send(app, post_request(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn ids(postings: &JsonValue) -> HashSet<String> {
    postings
        .as_array()
        .expect("array response")
        .iter()
        .map(|p| p["id"].as_str().expect("id").to_string())
        .collect()
}

#[tokio::test]
async fn create_list_and_search_flow() {
    let app = setup_app();

    let created = create(
        &app,
        json!({
            "profile": "Backend Engineer",
            "company": "Acme",
            "techs": ["Go", "SQL"],
            "exp": 3
        }),
    )
    .await;

    let id = created["id"].as_str().expect("assigned id").to_string();
    assert!(!id.is_empty());
    assert_eq!(created["status"], "Active");
    assert_eq!(created["applications"], 0);
    assert_eq!(created["views"], 0);
    assert_eq!(created["exp"], 3);
    assert_eq!(created["techs"], json!(["Go", "SQL"]));
    assert!(created["postedDate"].as_str().unwrap().ends_with('Z'));

    let (status, all) = get(&app, "/allPosts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([created.clone()]));

    let (status, hits) = get(&app, "/posts/Acme").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&hits).contains(&id));

    let (_, hits) = get(&app, "/posts/Engineer").await;
    assert_eq!(ids(&hits), HashSet::from([id.clone()]));

    let (status, hits) = get(&app, "/posts/Nonexistent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits, json!([]));
}

#[tokio::test]
async fn create_overrides_server_assigned_fields() {
    let app = setup_app();

    let created = create(
        &app,
        json!({
            "profile": "Designer",
            "status": "Closed",
            "applications": 12,
            "views": 99,
            "postedDate": "2001-01-01T00:00:00.000Z",
            "applicationDeadline": "2030-06-30T12:00:00.000Z"
        }),
    )
    .await;

    assert_eq!(created["status"], "Active");
    assert_eq!(created["applications"], 0);
    assert_eq!(created["views"], 0);
    assert_ne!(created["postedDate"], "2001-01-01T00:00:00.000Z");
    assert_eq!(created["applicationDeadline"], "2030-06-30T12:00:00.000Z");
}

#[tokio::test]
async fn list_is_empty_then_holds_every_created_posting() {
    let app = setup_app();

    let (status, all) = get(&app, "/allPosts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([]));

    let mut created_ids = HashSet::new();
    for company in ["Acme", "Globex", "Initech", "Umbrella"] {
        let created = create(&app, json!({ "profile": "Engineer", "company": company })).await;
        created_ids.insert(created["id"].as_str().unwrap().to_string());
    }
    assert_eq!(created_ids.len(), 4);

    let (_, all) = get(&app, "/allPosts").await;
    assert_eq!(ids(&all), created_ids);

    // repeated reads are stable
    let (_, again) = get(&app, "/allPosts").await;
    assert_eq!(all, again);
}

#[tokio::test]
async fn empty_body_fields_are_accepted() {
    let app = setup_app();

    let created = create(&app, json!({})).await;
    assert!(created["id"].is_string());
    assert!(created["profile"].is_null());
    assert_eq!(created["exp"], 0);
    assert_eq!(created["status"], "Active");
}

#[tokio::test]
async fn malformed_body_is_rejected_before_the_store() {
    let app = setup_app();

    let req = Request::builder()
        .method("POST")
        .uri("/post")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"exp": "three"}"#))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error());

    let (_, all) = get(&app, "/allPosts").await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = setup_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/allPosts"].is_object());
    assert!(doc["paths"]["/posts/{text}"].is_object());
    assert!(doc["paths"]["/post"].is_object());
}

#[tokio::test]
async fn blank_id_is_replaced_and_defaults_applied() {
    let app = setup_app();

    let first = create(&app, json!({ "id": "", "profile": "X", "status": "Closed" })).await;
    let second = create(&app, json!({ "id": "", "profile": "Y" })).await;

    for created in [&first, &second] {
        assert!(!created["id"].as_str().unwrap().is_empty());
        assert_eq!(created["status"], "Active");
        assert!(created["postedDate"].is_string());
    }
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn failing_store_surfaces_as_bare_500() {
    let app = app_with_store(Arc::new(UnreachableStore), Duration::from_secs(5));

    let (status, body) = send(&app, post_request(json!({ "profile": "Engineer" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_null());

    let (status, body) = get(&app, "/allPosts").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_null());

    let (status, _) = get(&app, "/posts/Engineer").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn stalled_store_times_out_on_create() {
    let app = app_with_store(Arc::new(StalledStore), Duration::from_millis(20));

    let (status, body) = send(&app, post_request(json!({ "profile": "Engineer" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_null());
}
