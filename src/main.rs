// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use medichat_rag_node::{
    api::{start_server, AppState},
    cli::{Cli, Commands},
    config::AppConfig,
    embeddings::HuggingFaceEmbedder,
    llm::GeminiClient,
    rag::{PipelineSettings, RagPipeline},
    vector::PineconeIndex,
    version,
};
use std::{env, sync::Arc};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!("Starting MediChat RAG node {}", version::get_version_string());
    log_config(&config);

    if cli.command() == Commands::CheckConfig {
        info!("Configuration OK");
        return Ok(());
    }

    let settings = PipelineSettings::from_config(&config)
        .map_err(|e| anyhow!("Invalid safety settings: {}", e))?;
    let embedder = HuggingFaceEmbedder::new(&config.embedding)
        .context("Failed to create embedding client")?;
    let index = PineconeIndex::new(&config.pinecone).context("Failed to create Pinecone client")?;
    let model = GeminiClient::new(&config.gemini).context("Failed to create Gemini client")?;

    let pipeline = Arc::new(RagPipeline::new(
        Arc::new(embedder),
        Arc::new(index),
        Arc::new(model),
        settings,
    ));
    let state = AppState::new(pipeline, &config);

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
        signal_token.cancel();
    });

    start_server(&config.server.listen_addr(), state, shutdown).await
}

fn log_config(config: &AppConfig) {
    info!(
        "Retrieval: index '{}', namespace '{}', top_k {}",
        config.retrieval.index_name, config.retrieval.namespace, config.retrieval.top_k
    );
    info!(
        "Embedding model: {}, generative model: {}",
        config.embedding.model, config.gemini.model
    );
    info!("Request deadline: {:?}", config.server.max_duration);

    for key in config.missing_credentials() {
        warn!("{} is not set; requests needing it will fail upstream", key);
    }

    if let Ok(settings) = config.gemini.safety_settings() {
        for setting in settings.iter().filter(|s| s.threshold.allows_all()) {
            warn!(
                "Safety filter relaxed: {:?} threshold is {}",
                setting.category, setting.threshold
            );
        }
    }
}
