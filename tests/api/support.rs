// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Recording stand-ins for the upstream services used by the API tests

use async_trait::async_trait;
use axum::{body::Body, http::Response, Router};
use medichat_rag_node::{
    api::http_server::{create_app, AppState},
    embeddings::{EmbeddingError, QueryEmbedder},
    llm::{GenerationRequest, GenerativeModel, LlmError, TextStream},
    rag::{PipelineSettings, RagPipeline},
    vector::{Passage, VectorError, VectorIndex, VectorQuery},
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct StubEmbedder {
    pub fail: bool,
    pub queries: Mutex<Vec<String>>,
}

#[async_trait]
impl QueryEmbedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.queries.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(EmbeddingError::ApiError {
                status: 500,
                message: "embedding backend down".to_string(),
            });
        }
        Ok(vec![0.25; 8])
    }

    fn model_name(&self) -> String {
        "stub-embedder".to_string()
    }
}

#[derive(Default)]
pub struct StubIndex {
    pub fail: bool,
    pub passages: Vec<Passage>,
    pub queries: Mutex<Vec<VectorQuery>>,
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn query(&self, query: VectorQuery) -> Result<Vec<Passage>, VectorError> {
        self.queries.lock().unwrap().push(query);
        if self.fail {
            return Err(VectorError::ApiError {
                status: 503,
                message: "index unavailable".to_string(),
            });
        }
        Ok(self.passages.clone())
    }

    fn name(&self) -> &'static str {
        "stub-index"
    }
}

/// How the stub model behaves once called
#[derive(Clone, Default)]
pub enum ModelBehavior {
    /// Stream the chunks, then finish
    #[default]
    Chunks,
    /// Refuse the request before streaming
    FailOnStart,
    /// Stream the chunks, then fail
    FailMidStream,
    /// Stream the chunks, then never finish
    HangAfterChunks,
}

#[derive(Default)]
pub struct StubModel {
    pub chunks: Vec<String>,
    pub behavior: ModelBehavior,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn stream_generate(&self, request: GenerationRequest) -> Result<TextStream, LlmError> {
        self.requests.lock().unwrap().push(request);

        let chunks: Vec<Result<String, LlmError>> =
            self.chunks.iter().cloned().map(Ok).collect();
        let head = futures::stream::iter(chunks);

        match self.behavior {
            ModelBehavior::Chunks => Ok(Box::pin(head)),
            ModelBehavior::FailOnStart => Err(LlmError::ApiError {
                status: 400,
                message: "API key not valid".to_string(),
            }),
            ModelBehavior::FailMidStream => {
                let tail = futures::stream::iter(vec![Err(LlmError::Transport(
                    "connection reset by peer".to_string(),
                ))]);
                Ok(Box::pin(futures::StreamExt::chain(head, tail)))
            }
            ModelBehavior::HangAfterChunks => Ok(Box::pin(futures::StreamExt::chain(
                head,
                futures::stream::pending(),
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "stub-model"
    }
}

pub fn passage(id: &str, text: &str) -> Passage {
    Passage {
        id: id.to_string(),
        score: 0.9,
        text: text.to_string(),
    }
}

pub fn settings() -> PipelineSettings {
    PipelineSettings {
        index_name: "medical-books".to_string(),
        namespace: "ns1".to_string(),
        top_k: 5,
        model: "models/gemini-1.5-pro-latest".to_string(),
        safety_settings: Vec::new(),
    }
}

pub struct TestApp {
    pub router: Router,
    pub embedder: Arc<StubEmbedder>,
    pub index: Arc<StubIndex>,
    pub model: Arc<StubModel>,
}

pub fn test_app(embedder: StubEmbedder, index: StubIndex, model: StubModel) -> TestApp {
    test_app_with_deadline(embedder, index, model, Duration::from_secs(60))
}

pub fn test_app_with_deadline(
    embedder: StubEmbedder,
    index: StubIndex,
    model: StubModel,
    max_duration: Duration,
) -> TestApp {
    let embedder = Arc::new(embedder);
    let index = Arc::new(index);
    let model = Arc::new(model);

    let pipeline = RagPipeline::new(embedder.clone(), index.clone(), model.clone(), settings());
    let state = AppState {
        pipeline: Arc::new(pipeline),
        max_duration,
        issues: Vec::new(),
    };

    TestApp {
        router: create_app(state),
        embedder,
        index,
        model,
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
