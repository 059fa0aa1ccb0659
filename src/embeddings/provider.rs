// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query embedder trait definition

use async_trait::async_trait;

use super::types::EmbeddingError;

/// Trait for turning a retrieval query into a dense vector
///
/// The vectors must come from the same model that embedded the indexed
/// passages, otherwise similarity search returns noise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    /// Embed a single query string
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Name of the embedding model, for logging
    fn model_name(&self) -> String;
}
