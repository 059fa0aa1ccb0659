// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for query embedding

use thiserror::Error;

/// Errors that can occur while embedding a retrieval query
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// API error from the embedding provider
    #[error("Embedding API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Hosted model is still loading
    #[error("Embedding model is loading, estimated {estimated_secs:.0}s")]
    ModelLoading { estimated_secs: f64 },

    #[error("Embedding request timed out")]
    Timeout,

    #[error("Embedding transport error: {0}")]
    Transport(String),

    /// Response did not contain a usable vector
    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EmbeddingError::Timeout
        } else {
            EmbeddingError::Transport(err.to_string())
        }
    }
}
