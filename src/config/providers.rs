// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upstream provider settings (vector index, embeddings, generative model)

use std::env;
use std::time::Duration;

use super::env_parse;
use crate::llm::{HarmBlockThreshold, HarmCategory, SafetySetting};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Pinecone vector index settings
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    /// Control plane used to resolve index hosts
    pub control_plane_url: String,
    /// Data plane host; skips the control plane lookup when set
    pub index_host: Option<String>,
    pub request_timeout: Duration,
}

impl PineconeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("PINECONE_API_KEY").unwrap_or_default(),
            control_plane_url: env::var("PINECONE_CONTROL_PLANE_URL")
                .unwrap_or(defaults.control_plane_url),
            index_host: env::var("PINECONE_INDEX_HOST")
                .ok()
                .filter(|h| !h.trim().is_empty()),
            request_timeout: env_parse("PINECONE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            control_plane_url: "https://api.pinecone.io".to_string(),
            index_host: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Hosted feature-extraction settings used to embed retrieval queries
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl EmbeddingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("HUGGINGFACE_API_KEY").unwrap_or_default(),
            base_url: env::var("HUGGINGFACE_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("EMBEDDING_MODEL").unwrap_or(defaults.model),
            request_timeout: env_parse("EMBEDDING_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api-inference.huggingface.co".to_string(),
            model: "mixedbread-ai/mxbai-embed-large-v1".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Gemini generative model settings
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Raw `HARM_CATEGORY_DANGEROUS_CONTENT` threshold name
    pub dangerous_content_threshold: String,
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            dangerous_content_threshold: env::var("GEMINI_DANGEROUS_CONTENT_THRESHOLD")
                .unwrap_or(defaults.dangerous_content_threshold),
        }
    }

    /// Safety settings sent with every generation request
    pub fn safety_settings(&self) -> Result<Vec<SafetySetting>, String> {
        let threshold: HarmBlockThreshold = self.dangerous_content_threshold.parse()?;
        Ok(vec![SafetySetting {
            category: HarmCategory::DangerousContent,
            threshold,
        }])
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("GEMINI_MODEL cannot be empty".to_string());
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid GEMINI_BASE_URL '{}': {}", self.base_url, e))?;
        self.safety_settings().map(|_| ())
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "models/gemini-1.5-pro-latest".to_string(),
            dangerous_content_threshold: "BLOCK_NONE".to_string(),
        }
    }
}
