// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod medichat;
pub mod streaming;

pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
pub use medichat::{medichat_handler, ChatData, ChatMessage, ChatRequest};
pub use streaming::{spawn_data_stream, DataStreamPart, FinishReason};
