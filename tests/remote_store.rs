//! Remote store integration tests.
//!
//! Emulates the hierarchical store's REST surface with a small axum app
//! and points a FirebaseStore at it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use onskeliste::config::Config;
use onskeliste::model::ItemRecord;
use onskeliste::store::{FirebaseStore, ItemStore};

#[derive(Clone)]
struct StubState {
    records: Arc<RwLock<HashMap<String, Value>>>,
    next_key: Arc<AtomicU64>,
    token: Option<String>,
}

#[derive(Deserialize)]
struct AuthQuery {
    auth: Option<String>,
}

fn denied(state: &StubState, query: &AuthQuery) -> bool {
    match &state.token {
        Some(expected) => query.auth.as_deref() != Some(expected.as_str()),
        None => false,
    }
}

async fn list_node(State(state): State<StubState>, Query(query): Query<AuthQuery>) -> Response {
    if denied(&state, &query) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let records = state.records.read().unwrap();
    if records.is_empty() {
        Json(Value::Null).into_response()
    } else {
        Json(records.clone()).into_response()
    }
}

async fn push_node(
    State(state): State<StubState>,
    Query(query): Query<AuthQuery>,
    Json(body): Json<Value>,
) -> Response {
    if denied(&state, &query) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let key = format!("-Kstub{:04}", state.next_key.fetch_add(1, Ordering::Relaxed));
    state.records.write().unwrap().insert(key.clone(), body);
    Json(json!({ "name": key })).into_response()
}

async fn get_record(
    State(state): State<StubState>,
    Path(id): Path<String>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if denied(&state, &query) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let key = id.trim_end_matches(".json");
    let records = state.records.read().unwrap();
    match records.get(key) {
        Some(value) => Json(value.clone()).into_response(),
        None => Json(Value::Null).into_response(),
    }
}

async fn put_record(
    State(state): State<StubState>,
    Path(id): Path<String>,
    Query(query): Query<AuthQuery>,
    Json(body): Json<Value>,
) -> Response {
    if denied(&state, &query) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let key = id.trim_end_matches(".json").to_string();
    state.records.write().unwrap().insert(key, body.clone());
    Json(body).into_response()
}

async fn delete_record(
    State(state): State<StubState>,
    Path(id): Path<String>,
    Query(query): Query<AuthQuery>,
) -> Response {
    if denied(&state, &query) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let key = id.trim_end_matches(".json");
    state.records.write().unwrap().remove(key);
    Json(Value::Null).into_response()
}

async fn start_stub(token: Option<&str>) -> String {
    let state = StubState {
        records: Arc::new(RwLock::new(HashMap::new())),
        next_key: Arc::new(AtomicU64::new(1)),
        token: token.map(str::to_string),
    };
    let app = Router::new()
        .route("/wishlist.json", get(list_node).post(push_node))
        .route(
            "/wishlist/:id",
            get(get_record).put(put_record).delete(delete_record),
        )
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn load_config(base: &str, token: Option<&str>) -> Config {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let mut yaml = format!("app:\n  port: 0\n  database_url: {base}\n");
    if let Some(token) = token {
        yaml.push_str(&format!("  auth_token: {token}\n"));
    }
    std::fs::write(&path, yaml).unwrap();
    Config::new(path.to_str().unwrap()).unwrap()
}

fn record(title: &str) -> ItemRecord {
    ItemRecord {
        title: title.to_string(),
        description: "for winter".to_string(),
        item_type: "gear".to_string(),
        priority: "high".to_string(),
        price: "1200 kr".to_string(),
        url: String::new(),
        created_at: "2026-02-01T10:00:00.000000Z".to_string(),
        updated_at: "2026-02-01T10:00:00.000000Z".to_string(),
    }
}

#[tokio::test]
async fn empty_collection_lists_nothing() {
    let base = start_stub(None).await;
    let cfg = load_config(&base, None);
    let store = FirebaseStore::new(&cfg).await.unwrap();

    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn push_assigns_a_key_and_round_trips() {
    let base = start_stub(None).await;
    let cfg = load_config(&base, None);
    let store = FirebaseStore::new(&cfg).await.unwrap();

    let id = store.create(&record("skis")).await.unwrap();
    assert!(id.starts_with("-Kstub"));

    let item = store.get(&id).await.unwrap().unwrap();
    assert_eq!(item.id, id);
    assert_eq!(item.record.title, "skis");
    assert_eq!(item.record.priority, "high");

    assert_eq!(store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_unknown_key_is_none() {
    let base = start_stub(None).await;
    let cfg = load_config(&base, None);
    let store = FirebaseStore::new(&cfg).await.unwrap();

    assert!(store.get("absent").await.unwrap().is_none());
}

#[tokio::test]
async fn replace_overwrites_the_record() {
    let base = start_stub(None).await;
    let cfg = load_config(&base, None);
    let store = FirebaseStore::new(&cfg).await.unwrap();

    let id = store.create(&record("before")).await.unwrap();
    let mut updated = record("after");
    updated.priority = "low".to_string();
    store.replace(&id, &updated).await.unwrap();

    let item = store.get(&id).await.unwrap().unwrap();
    assert_eq!(item.record.title, "after");
    assert_eq!(item.record.priority, "low");
}

#[tokio::test]
async fn delete_clears_the_key() {
    let base = start_stub(None).await;
    let cfg = load_config(&base, None);
    let store = FirebaseStore::new(&cfg).await.unwrap();

    let id = store.create(&record("gone")).await.unwrap();
    store.delete(&id).await.unwrap();

    assert!(store.get(&id).await.unwrap().is_none());
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn startup_fails_without_valid_credentials() {
    let base = start_stub(Some("sesame")).await;
    let cfg = load_config(&base, None);

    assert!(FirebaseStore::new(&cfg).await.is_err());
}

#[tokio::test]
async fn auth_token_is_attached_to_every_call() {
    let base = start_stub(Some("sesame")).await;
    let cfg = load_config(&base, Some("sesame"));
    let store = FirebaseStore::new(&cfg).await.unwrap();

    let id = store.create(&record("skis")).await.unwrap();
    assert_eq!(store.list_all().await.unwrap().len(), 1);
    store.delete(&id).await.unwrap();
}
