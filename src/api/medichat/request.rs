// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API request types

use serde::{Deserialize, Serialize};

/// One chat turn as sent by the chat UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// `user`, `assistant`, `system` or anything else the client uses
    #[serde(default)]
    pub role: String,
    pub content: String,
}

/// Extra request data attached by the chat UI
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatData {
    /// Free-text clinical report, possibly empty
    #[serde(default)]
    pub report_data: String,
}

/// Request body for POST /api/medichatgemini
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,

    #[serde(default)]
    pub data: ChatData,
}

impl ChatRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.messages.is_empty() {
            return Err("messages cannot be empty".to_string());
        }
        Ok(())
    }

    /// Content of the last message, which is the active question
    pub fn user_question(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }

    pub fn report(&self) -> &str {
        &self.data.report_data
    }
}
