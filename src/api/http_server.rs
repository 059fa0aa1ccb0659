// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    body::Body,
    http::Request,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use super::handlers::health_handler;
use super::medichat::medichat_handler;
use crate::config::AppConfig;
use crate::rag::RagPipeline;

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RagPipeline>,
    /// Deadline for one chat request, streamed body included
    pub max_duration: Duration,
    /// Configuration problems reported by the health check
    pub issues: Vec<String>,
}

impl AppState {
    pub fn new(pipeline: Arc<RagPipeline>, config: &AppConfig) -> Self {
        Self {
            pipeline,
            max_duration: config.server.max_duration,
            issues: config
                .missing_credentials()
                .into_iter()
                .map(|key| format!("{} not set", key))
                .collect(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/medichatgemini", post(medichat_handler))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API until `shutdown` is cancelled
pub async fn start_server(
    addr: &str,
    state: AppState,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}
