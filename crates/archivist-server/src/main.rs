//! Archivist — search gateway binary.

use std::path::PathBuf;
use std::sync::Arc;

use archivist_backend::ElasticsearchBackend;
use archivist_core::GatewayConfig;
use archivist_server::{build_router, AppState, TokenGate};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn print_usage() {
    println!("Archivist — search gateway for the tagged document archive");
    println!();
    println!("Usage: archivist [config-file]");
    println!();
    println!("  config-file   JSON config (default: $ARCHIVIST_CONFIG or config/config.json)");
    println!("  help          Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1).map(String::as_str) {
        Some("--help" | "-h" | "help") => {
            print_usage();
            return Ok(());
        }
        Some(path) => PathBuf::from(path),
        None => GatewayConfig::resolve_path(),
    };

    let config = GatewayConfig::load(&config_path)?;
    if config.tokens.is_empty() {
        warn!("No API tokens configured; every protected route will answer 401");
    }
    let port = config.port;

    let backend = ElasticsearchBackend::from_config(&config)?;
    let gate = TokenGate::from_config(&config);
    info!("Search backend index: {}", config.elasticsearch_index);

    let state = Arc::new(AppState::new(config, Arc::new(backend), Arc::new(gate)));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Archivist listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
