// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// RAG (Retrieval-Augmented Generation) module
// Grounds answers about a patient report in passages from the medical books index

pub mod errors;
pub mod pipeline;
pub mod prompt;
pub mod query;

pub use errors::RagError;
pub use pipeline::{PipelineSettings, RagAnswer, RagPipeline};
pub use prompt::{build_final_prompt, format_clinical_findings, NO_MATCHES};
pub use query::{build_retrieval_query, RETRIEVAL_INSTRUCTION};
