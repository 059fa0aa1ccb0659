// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end tests for POST /api/medichatgemini
//!
//! These tests verify that:
//! - The retrieval query and prompt are built from the report and last message
//! - The retrievals frame precedes all model text
//! - Bad requests are rejected before any upstream call
//! - Retrieval failures never reach the model
//! - Mid-stream failures and the deadline end the body with an error frame

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use std::time::Duration;
use tower::util::ServiceExt;

use super::support::{
    body_string, passage, test_app, test_app_with_deadline, ModelBehavior, StubEmbedder,
    StubIndex, StubModel,
};

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/medichatgemini")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn glucose_index() -> StubIndex {
    StubIndex {
        passages: vec![
            passage("p1", "Fasting plasma glucose of 126 mg/dL or higher indicates diabetes"),
            passage("p2", "Hyperglycemia commonly presents with polyuria and polydipsia"),
        ],
        ..Default::default()
    }
}

fn answer_model() -> StubModel {
    StubModel {
        chunks: vec![
            "**1. Key Findings**\n".to_string(),
            "- ❗ Glucose 180 mg/dL is elevated".to_string(),
        ],
        ..Default::default()
    }
}

const GLUCOSE_BODY: &str = r#"{
    "messages": [{"role": "user", "content": "What does my elevated glucose mean?"}],
    "data": {"reportData": "Glucose: 180 mg/dL"}
}"#;

#[tokio::test]
async fn test_glucose_question_end_to_end() {
    let app = test_app(StubEmbedder::default(), glucose_index(), answer_model());

    let response = app.router.oneshot(chat_request(GLUCOSE_BODY)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.headers()["x-vercel-ai-data-stream"], "v1");

    let body = body_string(response).await;
    let frames: Vec<&str> = body.lines().collect();

    assert_eq!(
        frames[0],
        r#"2:[{"retrievals":["Fasting plasma glucose of 126 mg/dL or higher indicates diabetes","Hyperglycemia commonly presents with polyuria and polydipsia"]}]"#
    );
    assert_eq!(frames[1], r#"0:"**1. Key Findings**\n""#);
    assert_eq!(frames[2], r#"0:"- ❗ Glucose 180 mg/dL is elevated""#);
    assert_eq!(frames[3], r#"d:{"finishReason":"stop"}"#);
    assert_eq!(frames.len(), 4);

    let queries = app.embedder.queries.lock().unwrap().clone();
    assert_eq!(
        queries,
        vec!["Represent this for searching relevant passages: patient medical report says: \nGlucose: 180 mg/dL. \n\nWhat does my elevated glucose mean?".to_string()]
    );

    let index_queries = app.index.queries.lock().unwrap().clone();
    assert_eq!(index_queries.len(), 1);
    assert_eq!(index_queries[0].index_name, "medical-books");
    assert_eq!(index_queries[0].namespace, "ns1");
    assert_eq!(index_queries[0].top_k, 5);

    let requests = app.model.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].prompt;
    assert!(prompt.contains("Patient Report: Glucose: 180 mg/dL"));
    assert!(prompt.contains("User Query: What does my elevated glucose mean?"));
    assert!(prompt.contains(
        "Clinical Finding 1: \n Fasting plasma glucose of 126 mg/dL or higher indicates diabetes"
    ));
    assert!(prompt.contains(
        "Clinical Finding 2: \n Hyperglycemia commonly presents with polyuria and polydipsia"
    ));
    assert_eq!(requests[0].model, "models/gemini-1.5-pro-latest");
}

#[tokio::test]
async fn test_last_message_is_the_question() {
    let app = test_app(StubEmbedder::default(), glucose_index(), answer_model());

    let body = r#"{
        "messages": [
            {"role": "user", "content": "hello"},
            {"role": "assistant", "content": "Hello! Ask me about your report."},
            {"role": "user", "content": "Is my glucose normal?"}
        ],
        "data": {"reportData": "Glucose: 95 mg/dL"}
    }"#;
    let response = app.router.oneshot(chat_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_string(response).await;

    let queries = app.embedder.queries.lock().unwrap().clone();
    assert!(queries[0].ends_with("Glucose: 95 mg/dL. \n\nIs my glucose normal?"));
    assert!(!queries[0].contains("hello"));

    let requests = app.model.requests.lock().unwrap().clone();
    assert!(requests[0].prompt.contains("User Query: Is my glucose normal?\n"));
}

#[tokio::test]
async fn test_missing_report_is_empty() {
    let app = test_app(StubEmbedder::default(), StubIndex::default(), answer_model());

    let body = r#"{"messages": [{"role": "user", "content": "hello"}]}"#;
    let response = app.router.oneshot(chat_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.starts_with("2:[{\"retrievals\":[]}]\n"));

    let queries = app.embedder.queries.lock().unwrap().clone();
    assert_eq!(
        queries[0],
        "Represent this for searching relevant passages: patient medical report says: \n. \n\nhello"
    );

    let requests = app.model.requests.lock().unwrap().clone();
    assert!(requests[0].prompt.contains("Clinical Findings: <nomatches>"));
}

#[tokio::test]
async fn test_empty_messages_rejected() {
    let app = test_app(StubEmbedder::default(), glucose_index(), answer_model());

    let response = app
        .router
        .oneshot(chat_request(r#"{"messages": [], "data": {"reportData": "x"}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["error_type"], "validation_error");
    assert!(json["detail"].as_str().unwrap().contains("messages"));

    assert!(app.embedder.queries.lock().unwrap().is_empty());
    assert!(app.model.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = test_app(StubEmbedder::default(), glucose_index(), answer_model());

    let response = app
        .router
        .oneshot(chat_request(r#"{"messages": [{"role": "user""#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["error_type"], "invalid_request");
    assert!(app.embedder.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let app = test_app(StubEmbedder::default(), glucose_index(), answer_model());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/medichatgemini")
        .body(Body::from(GLUCOSE_BODY))
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_index_failure_never_calls_model() {
    let index = StubIndex {
        fail: true,
        ..Default::default()
    };
    let app = test_app(StubEmbedder::default(), index, answer_model());

    let response = app.router.oneshot(chat_request(GLUCOSE_BODY)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["error_type"], "upstream_error");
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .starts_with("Vector index request failed"));

    assert_eq!(app.index.queries.lock().unwrap().len(), 1);
    assert!(app.model.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_embedding_failure_never_searches() {
    let embedder = StubEmbedder {
        fail: true,
        ..Default::default()
    };
    let app = test_app(embedder, glucose_index(), answer_model());

    let response = app.router.oneshot(chat_request(GLUCOSE_BODY)).await.unwrap();

    assert!(response.status().is_server_error());
    assert!(app.index.queries.lock().unwrap().is_empty());
    assert!(app.model.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_model_start_failure_is_5xx() {
    let model = StubModel {
        behavior: ModelBehavior::FailOnStart,
        ..Default::default()
    };
    let app = test_app(StubEmbedder::default(), glucose_index(), model);

    let response = app.router.oneshot(chat_request(GLUCOSE_BODY)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(json["detail"].as_str().unwrap().contains("API key not valid"));
}

#[tokio::test]
async fn test_mid_stream_failure_ends_with_error_frame() {
    let model = StubModel {
        chunks: vec!["**1. Key Findings**".to_string()],
        behavior: ModelBehavior::FailMidStream,
        ..Default::default()
    };
    let app = test_app(StubEmbedder::default(), glucose_index(), model);

    let response = app.router.oneshot(chat_request(GLUCOSE_BODY)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    let frames: Vec<&str> = body.lines().collect();
    assert!(frames[0].starts_with("2:"));
    assert_eq!(frames[1], r#"0:"**1. Key Findings**""#);
    assert!(frames[2].starts_with("3:"));
    assert!(frames[2].contains("connection reset by peer"));
    assert_eq!(frames[3], r#"d:{"finishReason":"error"}"#);
}

#[tokio::test]
async fn test_deadline_ends_stream_with_error_frame() {
    let model = StubModel {
        chunks: vec!["partial".to_string()],
        behavior: ModelBehavior::HangAfterChunks,
        ..Default::default()
    };
    let app = test_app_with_deadline(
        StubEmbedder::default(),
        glucose_index(),
        model,
        Duration::from_millis(200),
    );

    let response = app.router.oneshot(chat_request(GLUCOSE_BODY)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    let frames: Vec<&str> = body.lines().collect();
    assert_eq!(frames[1], r#"0:"partial""#);
    assert_eq!(frames[2], r#"3:"Response exceeded the maximum duration""#);
    assert_eq!(frames[3], r#"d:{"finishReason":"error"}"#);
}

#[tokio::test]
async fn test_get_not_allowed() {
    let app = test_app(StubEmbedder::default(), glucose_index(), answer_model());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/medichatgemini")
        .body(Body::empty())
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
