// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::{Parser, Subcommand};
use std::time::Duration;

use crate::config::AppConfig;

/// MediChat RAG node
#[derive(Parser, Debug)]
#[command(name = "medichat-rag-node")]
#[command(version)]
#[command(about = "Report-grounded medical chat over a vector index and a hosted model", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Interface to bind
    #[arg(long, env = "API_HOST", global = true)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(long, env = "API_PORT", global = true)]
    pub port: Option<u16>,

    /// Passages retrieved per question
    #[arg(long, env = "RAG_TOP_K", global = true)]
    pub top_k: Option<usize>,

    /// Deadline for one chat request in seconds
    #[arg(long, env = "MAX_DURATION_SECS", global = true)]
    pub max_duration_secs: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Validate configuration and exit
    CheckConfig,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }

    /// Override `config` with any flags that were given
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
        }
        if let Some(secs) = self.max_duration_secs {
            config.server.max_duration = Duration::from_secs(secs);
        }
    }
}
