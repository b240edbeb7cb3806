//! Search against a local fake cluster

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use quarry_domain::{Metadata, NodeOutput, OutputKind, Retriever};
use quarry_embed::MockEmbeddingModel;
use quarry_opensearch::{OpenSearchConfig, OpenSearchError, OpenSearchRetriever, SearchValues};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// "admin:secret"
const BASIC_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

#[derive(Clone, Default)]
struct FakeCluster {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn search(
    State(fake): State<FakeCluster>,
    Path(index): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
    if auth != Some(BASIC_AUTH) {
        return Err((StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))));
    }
    if index != "docs" {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": {"type": "index_not_found_exception", "reason": format!("no such index [{}]", index)},
                "status": 404
            })),
        ));
    }
    fake.requests.lock().unwrap().push((index, body));

    Ok(Json(json!({
        "took": 3,
        "hits": {
            "total": {"value": 3, "relation": "eq"},
            "hits": [
                {"_id": "1", "_score": 0.92, "_source": {"text": "Install with cargo.", "metadata": {"text": "Install with cargo.", "source": "https://help.test/install"}}},
                {"_id": "2", "_score": 0.81, "_source": {"text": "Configure profiles.", "metadata": {"source": "https://help.test/profiles"}}},
                {"_id": "3", "_score": 0.40, "_source": {"text": "Unrelated.", "metadata": {}}}
            ]
        }
    })))
}

async fn spawn(fake: FakeCluster) -> String {
    let app = Router::new()
        .route("/:index/_search", post(search))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(url: &str, index: &str) -> OpenSearchConfig {
    OpenSearchConfig::new(url, index).with_credentials("admin", "secret")
}

#[tokio::test]
async fn test_search_sends_knn_query_with_filter() {
    let fake = FakeCluster::default();
    let url = spawn(fake.clone()).await;
    let model = MockEmbeddingModel::new(8);
    let retriever = OpenSearchRetriever::from_config(&config(&url, "docs"), model.clone()).unwrap();

    let values = SearchValues::parse(&json!({"question": "how to install?", "filter": {"locale": "en"}})).unwrap();
    let output = retriever.run(&values, OutputKind::Documents).await.unwrap();

    assert_eq!(output.len(), 3);
    assert_eq!(model.call_count(), 1);

    let requests = fake.requests.lock().unwrap();
    let (index, body) = &requests[0];
    assert_eq!(index, "docs");
    assert_eq!(body["size"], json!(4));
    let knn = &body["query"]["bool"]["must"][0]["knn"]["embedding"];
    assert_eq!(knn["k"], json!(4));
    assert_eq!(knn["vector"].as_array().map(Vec::len), Some(8));
    assert_eq!(
        body["query"]["bool"]["filter"]["bool"]["must"],
        json!([{"match": {"metadata.locale": "en"}}])
    );
}

#[tokio::test]
async fn test_min_score_drops_low_hits() {
    let url = spawn(FakeCluster::default()).await;
    let config = OpenSearchConfig {
        min_score: Some(80.0),
        ..config(&url, "docs")
    };
    let retriever = OpenSearchRetriever::from_config(&config, MockEmbeddingModel::new(4)).unwrap();

    let docs = retriever.retrieve("profiles").await.unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].metadata_str("source"), Some("https://help.test/install"));
    assert_eq!(docs[1].text, "Configure profiles.");
}

#[tokio::test]
async fn test_text_output_prefers_metadata_text() {
    let url = spawn(FakeCluster::default()).await;
    let config = OpenSearchConfig {
        min_score: Some(50.0),
        ..config(&url, "docs")
    };
    let retriever = OpenSearchRetriever::from_config(&config, MockEmbeddingModel::new(4)).unwrap();

    let output = retriever.run(&SearchValues::new("install"), OutputKind::Text).await.unwrap();

    assert_eq!(
        output,
        NodeOutput::Text(vec!["Install with cargo.\nConfigure profiles.\n".to_string()])
    );
}

#[tokio::test]
async fn test_missing_index_is_api_error() {
    let url = spawn(FakeCluster::default()).await;
    let retriever = OpenSearchRetriever::from_config(&config(&url, "nope"), MockEmbeddingModel::new(4)).unwrap();

    let err = retriever.search("q", &Metadata::new()).await.unwrap_err();

    match err {
        OpenSearchError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "no such index [nope]");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_wrong_credentials_rejected() {
    let url = spawn(FakeCluster::default()).await;
    let config = OpenSearchConfig::new(&url, "docs").with_credentials("admin", "wrong");
    let retriever = OpenSearchRetriever::from_config(&config, MockEmbeddingModel::new(4)).unwrap();

    let err = retriever.retrieve("q").await.unwrap_err();

    assert!(matches!(err, OpenSearchError::Api { status: 401, .. }));
}

#[tokio::test]
async fn test_embedding_failure_skips_request() {
    let fake = FakeCluster::default();
    let url = spawn(fake.clone()).await;
    let retriever = OpenSearchRetriever::from_config(&config(&url, "docs"), MockEmbeddingModel::failing(4)).unwrap();

    let err = retriever.retrieve("q").await.unwrap_err();

    assert!(matches!(err, OpenSearchError::Embedding(_)));
    assert!(fake.requests.lock().unwrap().is_empty());
}

#[test]
fn test_invalid_config_rejected() {
    let result = OpenSearchRetriever::from_config(&OpenSearchConfig::new("", "docs"), MockEmbeddingModel::new(4));
    assert!(matches!(result, Err(OpenSearchError::InvalidInput(_))));
}
