use std::sync::Arc;

use tracing::info;

use ferry_agent::Bridge;
use ferry_core::config::{mask_secret, FerryConfig};
use ferry_discord::DiscordAdapter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferry_bot=info,ferry_discord=info,ferry_agent=info".into()),
        )
        .init();

    // load config: explicit path via FERRY_CONFIG > ~/.ferry/ferry.toml
    let config_path = std::env::var("FERRY_CONFIG").ok();
    let config = FerryConfig::load(config_path.as_deref())?;

    info!(url = %config.agent.api_url, "agent endpoint");
    info!(key = %mask_secret(&config.agent.api_key), "agent API key");
    info!(timeout_secs = config.agent.timeout_secs, "agent timeout");

    let bridge = Arc::new(Bridge::new(&config.agent));
    let adapter = DiscordAdapter::new(&config.discord, bridge)?;

    // Runs the gateway loop for the lifetime of the process.
    adapter.run().await;

    Ok(())
}
