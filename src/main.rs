use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use marquee::{
    api::AppState,
    config::Config,
    routes::create_router,
    services::providers::{MovieProvider, OmdbProvider},
    storage::create_store,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marquee=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let provider: Arc<dyn MovieProvider> = Arc::new(OmdbProvider::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?);
    let storage = create_store(&config).await?;

    // Initialize application state
    let state = AppState::new(
        provider,
        storage,
        &config.watchlist_key,
        config.related_limit,
    )
    .await;

    // Create the router with all routes
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
