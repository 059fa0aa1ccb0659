// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration
//!
//! Everything is read from the process environment (optionally seeded from a
//! `.env` file by the binary). API keys fall back to empty strings so the node
//! can start without them; requests that need a missing key fail upstream.

pub mod providers;

use std::env;
use std::time::Duration;

pub use providers::{EmbeddingConfig, GeminiConfig, PineconeConfig};

/// HTTP listener and request limits
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Deadline for a whole chat request, including the streamed body
    pub max_duration: Duration,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_duration: Duration::from_secs(60),
        }
    }
}

/// Retrieval settings for the chat route
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub index_name: String,
    pub namespace: String,
    /// Number of passages requested from the index
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            index_name: "medical-books".to_string(),
            namespace: "ns1".to_string(),
            top_k: 5,
        }
    }
}

/// Full node configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub retrieval: RetrievalConfig,
    pub pinecone: PineconeConfig,
    pub embedding: EmbeddingConfig,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let server_defaults = ServerConfig::default();
        let retrieval_defaults = RetrievalConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or(server_defaults.host),
                port: env_parse("API_PORT").unwrap_or(server_defaults.port),
                max_duration: env_parse("MAX_DURATION_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(server_defaults.max_duration),
            },
            retrieval: RetrievalConfig {
                index_name: env::var("PINECONE_INDEX_NAME")
                    .unwrap_or(retrieval_defaults.index_name),
                namespace: env::var("PINECONE_NAMESPACE").unwrap_or(retrieval_defaults.namespace),
                top_k: env_parse("RAG_TOP_K").unwrap_or(retrieval_defaults.top_k),
            },
            pinecone: PineconeConfig::from_env(),
            embedding: EmbeddingConfig::from_env(),
            gemini: GeminiConfig::from_env(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.retrieval.top_k == 0 {
            return Err("RAG_TOP_K must be greater than 0".to_string());
        }
        if self.retrieval.top_k > 100 {
            return Err("RAG_TOP_K cannot exceed 100".to_string());
        }
        if self.retrieval.index_name.trim().is_empty() {
            return Err("Index name cannot be empty".to_string());
        }
        if self.server.max_duration.is_zero() {
            return Err("MAX_DURATION_SECS must be greater than 0".to_string());
        }
        self.gemini.validate()?;
        Ok(())
    }

    /// Names of credentials that are still empty
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.pinecone.api_key.is_empty() {
            missing.push("PINECONE_API_KEY");
        }
        if self.embedding.api_key.is_empty() {
            missing.push("HUGGINGFACE_API_KEY");
        }
        if self.gemini.api_key.is_empty() {
            missing.push("GEMINI_API_KEY");
        }
        missing
    }
}

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
