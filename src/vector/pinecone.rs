// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pinecone vector index provider
//!
//! Queries go to the index's data plane host. The host is looked up once per
//! index through the control plane and cached, unless a fixed host is
//! configured.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::index::VectorIndex;
use super::types::{Passage, VectorError, VectorQuery};
use crate::config::PineconeConfig;

const API_VERSION: &str = "2024-07";

/// Metadata fields checked, in order, for the passage text
const TEXT_METADATA_KEYS: &[&str] = &["chunk", "text"];

/// Pinecone REST client
pub struct PineconeIndex {
    api_key: String,
    control_plane_url: String,
    fixed_host: Option<String>,
    hosts: RwLock<HashMap<String, String>>,
    client: Client,
}

impl PineconeIndex {
    pub fn new(config: &PineconeConfig) -> Result<Self, VectorError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| VectorError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            control_plane_url: config.control_plane_url.trim_end_matches('/').to_string(),
            fixed_host: config.index_host.as_deref().map(normalize_host),
            hosts: RwLock::new(HashMap::new()),
            client,
        })
    }

    /// Resolve the data plane base URL for `index_name`
    async fn index_host(&self, index_name: &str) -> Result<String, VectorError> {
        if let Some(host) = &self.fixed_host {
            return Ok(host.clone());
        }

        if let Some(host) = self.hosts.read().await.get(index_name) {
            return Ok(host.clone());
        }

        let url = format!("{}/indexes/{}", self.control_plane_url, index_name);
        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(VectorError::IndexNotFound(index_name.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VectorError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let description: IndexDescription = response
            .json()
            .await
            .map_err(|e| VectorError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        let host = description
            .host
            .filter(|h| !h.is_empty())
            .map(|h| normalize_host(&h))
            .ok_or_else(|| VectorError::IndexNotFound(format!("{} (no host yet)", index_name)))?;

        info!("Resolved Pinecone index '{}' to {}", index_name, host);
        self.hosts
            .write()
            .await
            .insert(index_name.to_string(), host.clone());
        Ok(host)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, query: VectorQuery) -> Result<Vec<Passage>, VectorError> {
        if self.api_key.is_empty() {
            return Err(VectorError::NoApiKey {
                provider: "pinecone".to_string(),
            });
        }

        let host = self.index_host(&query.index_name).await?;
        let body = QueryRequest {
            namespace: &query.namespace,
            vector: &query.vector,
            top_k: query.top_k,
            include_metadata: true,
            include_values: false,
        };

        let response = self
            .client
            .post(format!("{}/query", host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Pinecone query returned {}: {}", status, message);
            return Err(VectorError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let data: QueryResponse = response
            .json()
            .await
            .map_err(|e| VectorError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        let passages = data.into_passages();
        debug!(
            "Pinecone returned {} passages from {}/{}",
            passages.len(),
            query.index_name,
            query.namespace
        );
        Ok(passages)
    }

    fn name(&self) -> &'static str {
        "pinecone"
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

impl QueryResponse {
    /// Keep index order; skip matches that carry no passage text
    fn into_passages(self) -> Vec<Passage> {
        self.matches
            .into_iter()
            .filter_map(|m| {
                let text = m.metadata.as_ref().and_then(passage_text)?;
                Some(Passage {
                    id: m.id,
                    score: m.score.unwrap_or_default(),
                    text,
                })
            })
            .collect()
    }
}

fn passage_text(metadata: &serde_json::Value) -> Option<String> {
    TEXT_METADATA_KEYS
        .iter()
        .find_map(|key| metadata.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    score: Option<f32>,
    metadata: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: Option<String>,
}
