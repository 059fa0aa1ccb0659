// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Generative model trait definition

use async_trait::async_trait;

use super::types::{GenerationRequest, LlmError, TextStream};

/// Trait for hosted models that stream generated text
///
/// `stream_generate` resolves once the upstream call has been accepted; errors
/// that happen after that point arrive as items of the returned stream.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Start a streamed generation for `request`
    async fn stream_generate(&self, request: GenerationRequest) -> Result<TextStream, LlmError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
