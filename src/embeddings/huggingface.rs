// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hugging Face Inference API embedder
//!
//! Calls the `feature-extraction` pipeline for a sentence-embedding model. The
//! default model expects the "Represent this for searching relevant passages:"
//! prefix that the chat route puts in front of every retrieval query.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::QueryEmbedder;
use super::types::EmbeddingError;
use crate::config::EmbeddingConfig;

/// Hugging Face feature-extraction client
pub struct HuggingFaceEmbedder {
    api_key: String,
    base_url: String,
    model: String,
    client: Client,
}

impl HuggingFaceEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EmbeddingError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/pipeline/feature-extraction/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl QueryEmbedder for HuggingFaceEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = FeatureExtractionRequest {
            inputs: text,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(self.endpoint()).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Embedding API returned {}: {}", status, message);
            return Err(error_from_body(status.as_u16(), &message));
        }

        let output: FeatureExtractionOutput = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        let vector = output.into_vector()?;
        debug!("Embedded query with {} ({} dims)", self.model, vector.len());
        Ok(vector)
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}

fn error_from_body(status: u16, body: &str) -> EmbeddingError {
    match serde_json::from_str::<HfErrorBody>(body) {
        Ok(HfErrorBody {
            estimated_time: Some(estimated_secs),
            ..
        }) if status == 503 => EmbeddingError::ModelLoading { estimated_secs },
        Ok(parsed) => EmbeddingError::ApiError {
            status,
            message: parsed.error,
        },
        Err(_) => EmbeddingError::ApiError {
            status,
            message: body.to_string(),
        },
    }
}

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a str,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

/// Sentence models return one vector; token-level models return one per token
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeatureExtractionOutput {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

impl FeatureExtractionOutput {
    fn into_vector(self) -> Result<Vec<f32>, EmbeddingError> {
        let vector = match self {
            FeatureExtractionOutput::Flat(v) => v,
            FeatureExtractionOutput::Nested(mut rows) if rows.len() == 1 => rows.remove(0),
            FeatureExtractionOutput::Nested(rows) => mean_pool(&rows)?,
        };

        if vector.is_empty() {
            return Err(EmbeddingError::InvalidResponse(
                "empty embedding vector".to_string(),
            ));
        }
        Ok(vector)
    }
}

fn mean_pool(rows: &[Vec<f32>]) -> Result<Vec<f32>, EmbeddingError> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let dims = first.len();
    if rows.iter().any(|r| r.len() != dims) {
        return Err(EmbeddingError::InvalidResponse(
            "token vectors have mismatched dimensions".to_string(),
        ));
    }

    let mut pooled = vec![0.0f32; dims];
    for row in rows {
        for (acc, value) in pooled.iter_mut().zip(row) {
            *acc += value;
        }
    }
    let count = rows.len() as f32;
    pooled.iter_mut().for_each(|v| *v /= count);
    Ok(pooled)
}

#[derive(Debug, Deserialize)]
struct HfErrorBody {
    #[serde(default)]
    error: String,
    estimated_time: Option<f64>,
}
