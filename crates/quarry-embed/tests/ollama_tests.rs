//! Ollama client against a local fake server

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use quarry_domain::Embeddings;
use quarry_embed::{EmbedError, OllamaEmbeddings};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct FakeOllama {
    calls: Arc<AtomicUsize>,
    failures_before_success: usize,
    status_on_failure: u16,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn embeddings(
    State(fake): State<FakeOllama>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let call = fake.calls.fetch_add(1, Ordering::SeqCst);
    fake.bodies.lock().unwrap().push(body);
    if call < fake.failures_before_success {
        return Err(StatusCode::from_u16(fake.status_on_failure).unwrap());
    }
    Ok(Json(json!({"embedding": [0.25, 0.5, 0.75]})))
}

async fn spawn(fake: FakeOllama) -> String {
    let app = Router::new()
        .route("/api/embeddings", post(embeddings))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(endpoint: &str) -> OllamaEmbeddings {
    OllamaEmbeddings::new(endpoint, "nomic-embed-text", 3)
        .unwrap()
        .with_backoff(Duration::from_millis(1))
}

#[tokio::test]
async fn test_embed_query_posts_model_and_prompt() {
    let fake = FakeOllama::default();
    let endpoint = spawn(fake.clone()).await;

    let vector = client(&endpoint).embed_query("what is quarry?").await.unwrap();

    assert_eq!(vector, vec![0.25, 0.5, 0.75]);
    let bodies = fake.bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0], json!({"model": "nomic-embed-text", "prompt": "what is quarry?"}));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let fake = FakeOllama {
        failures_before_success: 2,
        status_on_failure: 503,
        ..FakeOllama::default()
    };
    let endpoint = spawn(fake.clone()).await;

    let vector = client(&endpoint).embed_query("retry me").await.unwrap();

    assert_eq!(vector.len(), 3);
    assert_eq!(fake.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let fake = FakeOllama {
        failures_before_success: 10,
        status_on_failure: 500,
        ..FakeOllama::default()
    };
    let endpoint = spawn(fake.clone()).await;

    let err = client(&endpoint).with_max_retries(2).embed_query("x").await.unwrap_err();

    assert!(matches!(err, EmbedError::Communication(ref m) if m.contains("500")));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_model_is_not_retried() {
    let fake = FakeOllama {
        failures_before_success: 10,
        status_on_failure: 404,
        ..FakeOllama::default()
    };
    let endpoint = spawn(fake.clone()).await;

    let err = client(&endpoint).embed_query("x").await.unwrap_err();

    assert!(matches!(err, EmbedError::ModelNotAvailable(ref m) if m == "nomic-embed-text"));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_dimension_mismatch() {
    let endpoint = spawn(FakeOllama::default()).await;
    let model = OllamaEmbeddings::new(&endpoint, "m", 768).unwrap();

    let err = model.embed_query("x").await.unwrap_err();

    assert!(matches!(err, EmbedError::InvalidResponse(_)));
}
