// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the retrieval-augmented chat pipeline
//!
//! Each stage has its own upstream error; the pipeline wraps them so the
//! HTTP layer can tell which collaborator failed.

use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::llm::LlmError;
use crate::vector::VectorError;

/// Errors that can occur while answering a chat request
#[derive(Error, Debug)]
pub enum RagError {
    /// Request cannot be answered as sent
    #[error("Invalid chat request: {0}")]
    InvalidRequest(String),

    /// Query embedding failed
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Vector index search failed
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] VectorError),

    /// Model call failed before streaming started
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),
}

impl RagError {
    /// Stage name for logs and error payloads
    pub fn stage(&self) -> &'static str {
        match self {
            RagError::InvalidRequest(_) => "request",
            RagError::Embedding(_) => "embedding",
            RagError::Retrieval(_) => "retrieval",
            RagError::Generation(_) => "generation",
        }
    }

    /// True when the failure came from an upstream service
    pub fn is_upstream(&self) -> bool {
        !matches!(self, RagError::InvalidRequest(_))
    }
}
