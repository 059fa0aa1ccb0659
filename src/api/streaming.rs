// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Line-framed data stream encoding for chat responses
//!
//! Every frame is `TYPE:JSON\n`. The chat UI's stream reader understands text
//! (`0`), data (`2`), error (`3`) and finish (`d`) frames.

use futures::StreamExt;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::llm::TextStream;

/// Header that tells the client to parse the body as a data stream
pub const DATA_STREAM_HEADER: &str = "x-vercel-ai-data-stream";
pub const DATA_STREAM_VERSION: &str = "v1";

/// Frames buffered between the generation task and the HTTP body
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Error,
}

impl FinishReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishReason::Stop => "stop",
            FinishReason::Error => "error",
        }
    }
}

/// One frame of the response body
#[derive(Debug, Clone, PartialEq)]
pub enum DataStreamPart {
    Text(String),
    Data(Vec<Value>),
    Error(String),
    Finish(FinishReason),
}

impl DataStreamPart {
    /// Metadata frame announcing the passages used for the answer
    pub fn retrievals(retrievals: &[String]) -> Self {
        DataStreamPart::Data(vec![json!({ "retrievals": retrievals })])
    }

    pub fn encode(&self) -> String {
        match self {
            DataStreamPart::Text(text) => format!("0:{}\n", Value::from(text.as_str())),
            DataStreamPart::Data(items) => format!("2:{}\n", Value::Array(items.clone())),
            DataStreamPart::Error(message) => format!("3:{}\n", Value::from(message.as_str())),
            DataStreamPart::Finish(reason) => {
                format!("d:{}\n", json!({ "finishReason": reason.as_str() }))
            }
        }
    }
}

/// Forward generated text into encoded frames on a bounded channel
///
/// The retrievals frame is always first. Generation errors and the deadline
/// both end the stream with an error frame followed by a finish frame. If the
/// receiver is dropped the task stops reading from `stream`.
pub fn spawn_data_stream(
    retrievals: Vec<String>,
    mut stream: TextStream,
    deadline: Instant,
) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        if tx
            .send(DataStreamPart::retrievals(&retrievals).encode())
            .await
            .is_err()
        {
            return;
        }

        let mut chunks = 0usize;
        let reason = loop {
            match tokio::time::timeout_at(deadline, stream.next()).await {
                Ok(Some(Ok(text))) => {
                    if text.is_empty() {
                        continue;
                    }
                    chunks += 1;
                    if tx.send(DataStreamPart::Text(text).encode()).await.is_err() {
                        debug!("Client disconnected after {} chunks", chunks);
                        return;
                    }
                }
                Ok(Some(Err(e))) => {
                    warn!("Generation failed mid-stream after {} chunks: {}", chunks, e);
                    let _ = tx.send(DataStreamPart::Error(e.to_string()).encode()).await;
                    break FinishReason::Error;
                }
                Ok(None) => break FinishReason::Stop,
                Err(_) => {
                    warn!("Response deadline passed after {} chunks", chunks);
                    let message = "Response exceeded the maximum duration".to_string();
                    let _ = tx.send(DataStreamPart::Error(message).encode()).await;
                    break FinishReason::Error;
                }
            }
        };

        debug!("Data stream finished ({}) after {} chunks", reason.as_str(), chunks);
        let _ = tx.send(DataStreamPart::Finish(reason).encode()).await;
    });

    rx
}
