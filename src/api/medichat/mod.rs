// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Medical chat API endpoint
//!
//! Provides the `/api/medichatgemini` HTTP endpoint for report-grounded chat.

pub mod handler;
pub mod request;

pub use handler::medichat_handler;
pub use request::{ChatData, ChatMessage, ChatRequest};
