mod artifacts;
mod config;
mod emit;
mod errors;
mod extraction;
mod keywords;
mod llm_client;
mod matching;
mod pipeline;
mod routes;
mod search_client;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::artifacts::ArtifactStore;
use crate::config::{mask_secret, Config};
use crate::keywords::KeywordSummarizer;
use crate::llm_client::LlmClient;
use crate::matching::TokenSetScorer;
use crate::routes::build_router;
use crate::search_client::SearchClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing API keys)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Optimizer API v{}", env!("CARGO_PKG_VERSION"));
    info!("OPENAI_API_KEY loaded: {}", mask_secret(&config.openai_api_key));
    info!("SERPER_API_KEY loaded: {}", mask_secret(&config.serper_api_key));

    // Initialize outbound clients
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
        config.llm_timeout,
    )?;
    info!(
        "LLM client initialized (model: {}, timeout: {}s)",
        llm_client::MODEL,
        config.llm_timeout.as_secs()
    );
    let search = SearchClient::new(
        config.serper_api_key.clone(),
        &config.serper_base_url,
        config.search_timeout,
    )?;
    info!(
        "Search client initialized (timeout: {}s)",
        config.search_timeout.as_secs()
    );

    let summarizer = KeywordSummarizer::new(
        Arc::new(llm),
        Arc::new(search),
        config.llm_timeout,
        config.search_timeout,
    );

    let artifacts = match &config.artifact_dir {
        Some(dir) => ArtifactStore::at(dir)?,
        None => ArtifactStore::temporary()?,
    };
    info!("Artifacts stored under {}", artifacts.root().display());

    // Build app state
    let state = AppState {
        config: config.clone(),
        scorer: Arc::new(TokenSetScorer),
        summarizer: Arc::new(summarizer),
        artifacts,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the upload form has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
