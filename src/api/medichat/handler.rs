// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API endpoint handler

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures::StreamExt;
use tokio::time::Instant;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use super::request::ChatRequest;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::streaming::{spawn_data_stream, DATA_STREAM_HEADER, DATA_STREAM_VERSION};

/// POST /api/medichatgemini - Answer a question about a clinical report
///
/// # Request
/// - `messages`: Chat history; the last message is the question (required, non-empty)
/// - `data.reportData`: Free-text clinical report (default empty)
///
/// # Response
/// A `text/plain` data stream: one `2:` frame with the retrieved passages,
/// then `0:` text frames from the model, then a `d:` finish frame.
///
/// # Errors
/// - 400 Bad Request: Malformed body or empty `messages`
/// - 502 Bad Gateway: Embedding, vector index or model call failed
/// - 503 Service Unavailable: Embedding model still loading
/// - 504 Gateway Timeout: Upstream timeout or deadline passed before streaming
pub async fn medichat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected chat request body: {}", e.body_text());
        ApiError::InvalidRequest(e.body_text())
    })?;

    if let Err(e) = request.validate() {
        warn!("Chat validation failed: {}", e);
        return Err(ApiError::ValidationError {
            field: "messages".to_string(),
            message: e,
        });
    }

    let question = request.user_question().unwrap_or_default();
    let report = request.report();
    debug!(
        "Chat request: {} messages, report {} chars, question {} chars",
        request.messages.len(),
        report.len(),
        question.len()
    );

    let deadline = Instant::now() + state.max_duration;
    let answer = tokio::time::timeout_at(deadline, state.pipeline.answer(report, question))
        .await
        .map_err(|_| {
            warn!("Chat deadline passed before generation started");
            ApiError::UpstreamTimeout { service: "Chat" }
        })?
        .map_err(|e| {
            warn!("Chat pipeline failed at {}: {}", e.stage(), e);
            ApiError::from(e)
        })?;

    info!(
        "Streaming answer grounded on {} passages",
        answer.retrievals.len()
    );

    let frames = spawn_data_stream(answer.retrievals, answer.stream, deadline);
    let body = Body::from_stream(ReceiverStream::new(frames).map(Ok::<_, Infallible>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(DATA_STREAM_HEADER, DATA_STREAM_VERSION)
        .body(body)
        .map_err(|e| ApiError::InternalError(format!("Failed to build response: {}", e)))
}
