// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query embedding for vector retrieval

pub mod huggingface;
pub mod provider;
pub mod types;

pub use huggingface::HuggingFaceEmbedder;
pub use provider::QueryEmbedder;
pub use types::EmbeddingError;
