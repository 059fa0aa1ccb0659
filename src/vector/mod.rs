// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector index retrieval
//!
//! The index and its embedding model are managed externally; this module only
//! issues namespace-scoped nearest-neighbour queries and extracts passage text.

pub mod index;
pub mod pinecone;
pub mod types;

pub use index::VectorIndex;
pub use pinecone::PineconeIndex;
pub use types::{Passage, VectorError, VectorQuery};
