// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted generative model access
//!
//! The chat route only needs "prompt in, text chunks out", so providers sit
//! behind the [`GenerativeModel`] trait. Gemini is the only implementation.

pub mod gemini;
pub mod model;
pub mod sse;
pub mod types;

pub use gemini::GeminiClient;
pub use model::GenerativeModel;
pub use sse::SseDecoder;
pub use types::{
    GenerationRequest, HarmBlockThreshold, HarmCategory, LlmError, SafetySetting, TextStream,
};
