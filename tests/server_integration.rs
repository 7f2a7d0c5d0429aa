use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use spam_or_ham::{
    pipeline::Pipeline,
    server::{AppState, router},
};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

mod common;
use common::{MESSAGE_1, MESSAGE_2, MockLoader};

fn create_test_app(loader: MockLoader) -> Router {
    router(AppState::new(Pipeline::new(Arc::new(loader))))
}

async fn post_classify(app: Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/classify")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_classify_endpoint_success() {
    let app = create_test_app(MockLoader::new().with_scores(vec![vec![0.7, 0.3], vec![0.2, 0.8]]));
    let body = json!({"function": "spam_or_ham", "messages": [MESSAGE_1, MESSAGE_2]});

    let (status, response) = post_classify(app, body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response,
        json!({
            "status_code": 200,
            "function": "spam_or_ham",
            "responses": {MESSAGE_1: "ham", MESSAGE_2: "spam"},
            "errors": []
        })
    );
}

#[tokio::test]
async fn test_classify_endpoint_validation_error() {
    let app = create_test_app(MockLoader::new());

    let (status, response) = post_classify(app, "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response,
        json!({"status_code": 400, "function": "", "responses": {}, "errors": ["Event object is empty"]})
    );
}

#[tokio::test]
async fn test_classify_endpoint_malformed_body() {
    let app = create_test_app(MockLoader::new());

    let (status, response) = post_classify(app, "{\"function\": ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = response["errors"][0].as_str().unwrap();
    assert!(error.starts_with("Unable to parse event object: "), "{error}");
    assert_eq!(response["function"], "");
}

#[tokio::test]
async fn test_classify_endpoint_load_failure() {
    let app = create_test_app(MockLoader::new().with_encoder_load_error("disk error"));
    let body = json!({"function": "spam_or_ham", "messages": [MESSAGE_1]});

    let (status, response) = post_classify(app, body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["errors"], json!(["disk error"]));
    assert_eq!(response["function"], "spam_or_ham");
}
