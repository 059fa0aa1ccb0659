// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval-augmented answer pipeline
//!
//! One call runs embed, search, prompt assembly and the start of generation
//! in that order. Any failure before the model accepts the request is
//! returned as an error so the caller can still answer with a status code.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::errors::RagError;
use super::prompt::{build_final_prompt, format_clinical_findings};
use super::query::build_retrieval_query;
use crate::config::AppConfig;
use crate::embeddings::QueryEmbedder;
use crate::llm::{GenerationRequest, GenerativeModel, SafetySetting, TextStream};
use crate::vector::{Passage, VectorIndex, VectorQuery};

/// Static settings applied to every request
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub index_name: String,
    pub namespace: String,
    pub top_k: usize,
    /// Model identifier passed to the generative model
    pub model: String,
    pub safety_settings: Vec<SafetySetting>,
}

impl PipelineSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        Ok(Self {
            index_name: config.retrieval.index_name.clone(),
            namespace: config.retrieval.namespace.clone(),
            top_k: config.retrieval.top_k,
            model: config.gemini.model.clone(),
            safety_settings: config.gemini.safety_settings()?,
        })
    }
}

/// Everything produced for one question, with generation already started
pub struct RagAnswer {
    /// Text that was embedded for retrieval
    pub retrieval_query: String,
    /// Retrieved passage texts, best match first
    pub retrievals: Vec<String>,
    /// Final prompt sent to the model
    pub prompt: String,
    /// Generated text chunks
    pub stream: TextStream,
}

/// Embed, retrieve, then generate
pub struct RagPipeline {
    embedder: Arc<dyn QueryEmbedder>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn GenerativeModel>,
    settings: PipelineSettings,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn QueryEmbedder>,
        index: Arc<dyn VectorIndex>,
        model: Arc<dyn GenerativeModel>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            embedder,
            index,
            model,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Embed `retrieval_query` and return the top passages from the index
    pub async fn retrieve(&self, retrieval_query: &str) -> Result<Vec<Passage>, RagError> {
        let vector = self.embedder.embed(retrieval_query).await?;
        debug!(
            "Embedded retrieval query with {} ({} dims)",
            self.embedder.model_name(),
            vector.len()
        );

        let passages = self
            .index
            .query(VectorQuery {
                index_name: self.settings.index_name.clone(),
                namespace: self.settings.namespace.clone(),
                vector,
                top_k: self.settings.top_k,
            })
            .await?;

        Ok(passages)
    }

    /// Answer `question` about `report`
    ///
    /// Returns once the model has accepted the prompt. Errors after that point
    /// arrive through [`RagAnswer::stream`].
    pub async fn answer(&self, report: &str, question: &str) -> Result<RagAnswer, RagError> {
        let started = Instant::now();
        let retrieval_query = build_retrieval_query(report, question);

        let passages = self.retrieve(&retrieval_query).await?;
        info!(
            "Retrieved {} passages from {} in {:?}",
            passages.len(),
            self.index.name(),
            started.elapsed()
        );

        let findings = format_clinical_findings(&passages);
        let prompt = build_final_prompt(report, question, &findings);

        let request = GenerationRequest::new(self.settings.model.clone(), prompt.clone())
            .with_safety_settings(self.settings.safety_settings.clone());
        let stream = self.model.stream_generate(request).await?;
        debug!("{} accepted generation request", self.model.name());

        Ok(RagAnswer {
            retrieval_query,
            retrievals: passages.into_iter().map(|p| p.text).collect(),
            prompt,
            stream,
        })
    }
}
