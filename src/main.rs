use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use transcode_api::config::settings::AppConfig;
use transcode_api::infrastructure::redis::client::RedisService;
use transcode_api::modules::provider::registry::ProviderRegistry;
use transcode_api::repository::Repository;
use transcode_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("REDIS_URL must be set")?;

    let redis = RedisService::new(&config.redis_url)
        .await
        .context("failed to connect to Redis")?;
    let repository = Repository::new(Arc::new(redis));

    // Provider adapters register their factories here.
    let providers = ProviderRegistry::new();

    let port = config.server_port;
    let state = AppState::new(config, repository, providers);
    let app = transcode_api::app::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
