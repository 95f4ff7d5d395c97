use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use shared::domain::Category;
use tokio::{net::TcpListener, sync::Mutex};

use super::*;

#[derive(Debug, Clone)]
struct CapturedRequest {
    method: &'static str,
    query: HashMap<String, String>,
    apikey: Option<String>,
    authorization: Option<String>,
    prefer: Option<String>,
    body: Option<Value>,
}

#[derive(Clone)]
struct MockState {
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    status: StatusCode,
    response: Value,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn record(
    state: &MockState,
    method: &'static str,
    headers: &HeaderMap,
    query: HashMap<String, String>,
    body: Option<Value>,
) -> Response {
    state.captured.lock().await.push(CapturedRequest {
        method,
        query,
        apikey: header(headers, "apikey"),
        authorization: header(headers, "authorization"),
        prefer: header(headers, "prefer"),
        body,
    });
    (state.status, Json(state.response.clone())).into_response()
}

async fn handle_get(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "GET", &headers, query, None).await
}

async fn handle_post(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST", &headers, query, Some(body)).await
}

async fn handle_patch(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "PATCH", &headers, query, Some(body)).await
}

async fn spawn_table_server(
    status: StatusCode,
    response: Value,
) -> (SupabaseStore, Arc<Mutex<Vec<CapturedRequest>>>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        captured: Arc::clone(&captured),
        status,
        response,
    };
    let app = Router::new()
        .route(
            "/rest/v1/facts",
            get(handle_get).post(handle_post).patch(handle_patch),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let settings = StoreSettings::new(format!("http://{addr}"), "test-anon-key").expect("settings");
    (SupabaseStore::new(settings), captured)
}

fn row(id: i64, category: &str, likes: u32) -> Value {
    json!({
        "id": id,
        "text": format!("row {id}"),
        "source": "https://example.com",
        "category": category,
        "likes": likes,
        "upvotes": 0,
        "downvotes": 0,
        "created_at": "2024-07-17T20:03:47.123456+00:00"
    })
}

#[tokio::test]
async fn list_sends_filter_order_limit_and_credentials() {
    let (store, captured) = spawn_table_server(
        StatusCode::OK,
        json!([row(2, "science", 9), row(1, "science", 4)]),
    )
    .await;

    let facts = store
        .list_facts(CategoryFilter::Only(Category::Science))
        .await
        .expect("list");
    assert_eq!(facts.len(), 2);
    assert_eq!(facts[0].id, FactId(2));

    let requests = captured.lock().await;
    let request = &requests[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.query.get("select").map(String::as_str), Some("*"));
    assert_eq!(
        request.query.get("order").map(String::as_str),
        Some("likes.desc")
    );
    assert_eq!(request.query.get("limit").map(String::as_str), Some("20"));
    assert_eq!(
        request.query.get("category").map(String::as_str),
        Some("eq.science")
    );
    assert_eq!(request.apikey.as_deref(), Some("test-anon-key"));
    assert_eq!(
        request.authorization.as_deref(),
        Some("Bearer test-anon-key")
    );
}

#[tokio::test]
async fn list_all_omits_category_filter() {
    let (store, captured) = spawn_table_server(StatusCode::OK, json!([])).await;

    let facts = store.list_facts(CategoryFilter::All).await.expect("list");
    assert!(facts.is_empty());

    let requests = captured.lock().await;
    assert!(!requests[0].query.contains_key("category"));
}

#[tokio::test]
async fn insert_posts_single_row_and_returns_representation() {
    let (store, captured) =
        spawn_table_server(StatusCode::CREATED, json!([row(41, "science", 0)])).await;

    let created = store
        .insert_fact(&NewFact {
            text: "Valid fact".to_string(),
            source: "https://example.com".to_string(),
            category: Category::Science,
        })
        .await
        .expect("insert");
    assert_eq!(created.id, FactId(41));

    let requests = captured.lock().await;
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.prefer.as_deref(), Some("return=representation"));
    assert_eq!(
        request.body,
        Some(json!([{
            "text": "Valid fact",
            "source": "https://example.com",
            "category": "science"
        }]))
    );
}

#[tokio::test]
async fn increment_patches_one_counter_on_matching_id() {
    let (store, captured) = spawn_table_server(StatusCode::OK, json!([row(5, "news", 4)])).await;

    let updated = store
        .increment_vote(FactId(5), VoteKind::Likes, 3)
        .await
        .expect("vote");
    assert_eq!(updated.likes, 4);

    let requests = captured.lock().await;
    let request = &requests[0];
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.query.get("id").map(String::as_str), Some("eq.5"));
    assert_eq!(request.body, Some(json!({ "likes": 4 })));
    assert_eq!(request.prefer.as_deref(), Some("return=representation"));
}

#[tokio::test]
async fn error_body_is_surfaced_as_api_error() {
    let (store, _captured) = spawn_table_server(
        StatusCode::UNAUTHORIZED,
        json!({ "message": "Invalid API key", "hint": "Double check your key" }),
    )
    .await;

    let err = store
        .list_facts(CategoryFilter::All)
        .await
        .expect_err("must fail");
    match err {
        StoreError::Api { status, error } => {
            assert_eq!(status, 401);
            assert_eq!(error.code, shared::error::ErrorCode::Unauthorized);
            assert_eq!(error.message, "Invalid API key");
            assert_eq!(error.hint.as_deref(), Some("Double check your key"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_update_representation_is_an_error() {
    let (store, _captured) = spawn_table_server(StatusCode::OK, json!([])).await;

    let err = store
        .increment_vote(FactId(404), VoteKind::Downvotes, 0)
        .await
        .expect_err("no row");
    assert!(matches!(
        err,
        StoreError::EmptyResponse {
            operation: "vote update"
        }
    ));
    assert_eq!(err.status(), None);
}
