// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for vector index retrieval

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A nearest-neighbour search against one namespace of an index
#[derive(Debug, Clone, PartialEq)]
pub struct VectorQuery {
    pub index_name: String,
    pub namespace: String,
    pub vector: Vec<f32>,
    pub top_k: usize,
}

/// One retrieved passage, in index ranking order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passage {
    /// Record id in the index
    pub id: String,
    /// Similarity score reported by the index
    pub score: f32,
    /// Passage text stored in the record metadata
    pub text: String,
}

/// Errors that can occur during vector index operations
#[derive(Debug, Error)]
pub enum VectorError {
    /// API error from the index provider
    #[error("Vector index API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Index does not exist or has no data plane host yet
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("No API key configured for {provider}")]
    NoApiKey { provider: String },

    #[error("Vector index request timed out")]
    Timeout,

    #[error("Vector index transport error: {0}")]
    Transport(String),

    #[error("Invalid vector index response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for VectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VectorError::Timeout
        } else {
            VectorError::Transport(err.to_string())
        }
    }
}
