// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::http_server::AppState;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

impl HealthResponse {
    pub fn healthy(issues: &[String]) -> Self {
        Self {
            status: "healthy".to_string(),
            version: version::VERSION_NUMBER.to_string(),
            issues: if issues.is_empty() {
                None
            } else {
                Some(issues.to_vec())
            },
        }
    }
}

/// GET /api/health
///
/// Reports missing upstream credentials as `issues` without failing the check.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(&state.issues))
}
