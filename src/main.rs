#![deny(unused)]
//! Prompt Forge - prompt enhancement service
//!
//! Turns a short free-text prompt into a structured JSON or XML document
//! through a free-tier OpenRouter model, behind a password-gated web UI.

use std::sync::Arc;
use std::time::Duration;

use prompt_forge_core::config::AppConfig;
use prompt_forge_enhancer::{schema_for, CompletionSettings, EnhancementService};
use prompt_forge_gateway::{AppState, GatewayServer, PasswordGate};
use prompt_forge_model_gateway::{CachedCatalog, OpenRouterClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize tracing
    prompt_forge_governance::configure_tracing(config.governance.json_logs)?;

    tracing::info!("Starting Prompt Forge v{}", env!("CARGO_PKG_VERSION"));

    // =========================================================================
    // Upstream
    // =========================================================================
    let openrouter = Arc::new(OpenRouterClient::new(&config.model_gateway)?);
    tracing::info!(base_url = %openrouter.base_url(), "OpenRouter client initialized");

    let catalog = Arc::new(
        CachedCatalog::new(openrouter.clone())
            .with_ttl(Duration::from_secs(config.model_gateway.catalog_ttl_secs)),
    );

    // =========================================================================
    // Enhancement pipeline
    // =========================================================================
    let settings = CompletionSettings::from(&config.enhancer);
    let enhancer = Arc::new(
        EnhancementService::new(openrouter, schema_for(config.enhancer.schema))
            .with_settings(settings),
    );
    tracing::info!(
        schema = %config.enhancer.schema,
        temperature = settings.temperature,
        max_tokens = settings.max_tokens,
        "Enhancement service initialized"
    );

    // =========================================================================
    // Start the server
    // =========================================================================
    let state = AppState::new(enhancer, catalog, PasswordGate::new(&config.auth));
    let mut server = GatewayServer::new(config.server.clone(), config.gateway.clone(), state);

    if config.governance.enable_metrics {
        server = server.with_metrics(prompt_forge_governance::setup_metrics_recorder()?);
    }

    server.run().await?;

    Ok(())
}
