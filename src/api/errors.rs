// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::embeddings::EmbeddingError;
use crate::llm::LlmError;
use crate::rag::RagError;
use crate::vector::VectorError;

/// JSON body for every error returned before streaming starts
///
/// The chat UI reads `detail` and shows it to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
    pub error_type: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError { field: String, message: String },
    /// An upstream service answered with an error
    UpstreamError { service: &'static str, message: String },
    /// An upstream service could not be reached in time
    UpstreamTimeout { service: &'static str },
    ServiceUnavailable(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let error_type = match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::ValidationError { .. } => "validation_error",
            ApiError::UpstreamError { .. } => "upstream_error",
            ApiError::UpstreamTimeout { .. } => "upstream_timeout",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::InternalError(_) => "internal_error",
        };

        ErrorResponse {
            detail: self.to_string(),
            error_type: error_type.to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::UpstreamError { .. } => 502,
            ApiError::UpstreamTimeout { .. } => 504,
            ApiError::ServiceUnavailable(_) => 503,
            ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::UpstreamError { service, message } => {
                write!(f, "{} request failed: {}", service, message)
            }
            ApiError::UpstreamTimeout { service } => write!(f, "{} request timed out", service),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::InvalidRequest(msg) => ApiError::InvalidRequest(msg),
            RagError::Embedding(EmbeddingError::Timeout) => ApiError::UpstreamTimeout {
                service: "Embedding",
            },
            RagError::Embedding(EmbeddingError::ModelLoading { estimated_secs }) => {
                ApiError::ServiceUnavailable(format!(
                    "embedding model is loading, retry in about {:.0}s",
                    estimated_secs
                ))
            }
            RagError::Embedding(e) => ApiError::UpstreamError {
                service: "Embedding",
                message: e.to_string(),
            },
            RagError::Retrieval(VectorError::Timeout) => ApiError::UpstreamTimeout {
                service: "Vector index",
            },
            RagError::Retrieval(e) => ApiError::UpstreamError {
                service: "Vector index",
                message: e.to_string(),
            },
            RagError::Generation(LlmError::Timeout) => ApiError::UpstreamTimeout {
                service: "Model",
            },
            RagError::Generation(e) => ApiError::UpstreamError {
                service: "Model",
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
