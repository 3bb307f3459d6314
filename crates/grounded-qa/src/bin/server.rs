//! QA server binary
//!
//! Run with: cargo run -p grounded-qa --bin grounded-qa-server

use anyhow::Context;
use grounded_qa::{config::QaConfig, server::QaServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grounded_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = QaConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Model: {}", config.llm.model);
    tracing::info!("  - Relevance gate: {:?}", config.relevance.mode);
    tracing::info!("  - Reference document: {}", config.document.path.display());

    // Missing credential is the only fatal startup condition; the document
    // extraction inside degrades to an empty context on failure.
    let server = QaServer::new(config).context("server startup failed")?;

    println!("\nServer starting...");
    println!("  UI:     http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /ask  - Ask a question (form-encoded)");
    println!("  POST /chat - Ask a question (JSON)");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
