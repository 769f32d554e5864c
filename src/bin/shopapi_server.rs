//! Product search API server.
//!
//! Usage: `shopapi-server [config.toml]`. Without an argument the config is
//! read from `$SHOPAPI_CONFIG` or the platform config directory, falling
//! back to defaults. `SERPAPI_KEY` enables the SerpAPI source.

use shopapi::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load(std::env::args_os().nth(1).map(PathBuf::from))?;
    let sources: Vec<&str> = config.search.sources.iter().map(|s| s.name()).collect();
    tracing::info!(
        ?sources,
        api_key = config.search.effective_api_key().is_some(),
        "shopapi starting"
    );

    let search = shop_search::build_service(&config.search)
        .map_err(|e| anyhow::anyhow!("failed to build search service: {e}"))?;

    shopapi::run_server(&config.server.bind_addr(), Arc::new(search))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "shopapi exited with error");
            e
        })?;

    tracing::info!("shopapi shut down cleanly");
    Ok(())
}
