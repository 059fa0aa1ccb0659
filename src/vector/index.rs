// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector index trait definition

use async_trait::async_trait;

use super::types::{Passage, VectorError, VectorQuery};

/// Trait for managed similarity-search stores
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `query.top_k` passages, best match first
    async fn query(&self, query: VectorQuery) -> Result<Vec<Passage>, VectorError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
