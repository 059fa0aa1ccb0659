// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the MediChat RAG node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-medichat-rag-2025-10-16";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-10-16";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "rag-chat",
    "pinecone-retrieval",
    "huggingface-embeddings",
    "gemini-streaming",
    "data-stream-protocol",
];

/// Get the full version string
pub fn get_version_string() -> String {
    format!("{} ({})", VERSION, BUILD_DATE)
}
