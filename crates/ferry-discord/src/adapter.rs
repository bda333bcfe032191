use std::sync::Arc;
use std::time::Duration;

use serenity::model::gateway::GatewayIntents;
use serenity::Client;
use tracing::{error, info, warn};

use ferry_agent::Bridge;
use ferry_core::config::DiscordConfig;

use crate::error::DiscordError;
use crate::handler::DiscordHandler;

/// Discord gateway adapter.
///
/// Wraps a serenity `Client` and drives the event loop until the process
/// exits. Reconnects automatically whenever the gateway drops.
pub struct DiscordAdapter {
    bridge: Arc<Bridge>,
    config: DiscordConfig,
}

impl DiscordAdapter {
    pub fn new(config: &DiscordConfig, bridge: Arc<Bridge>) -> Result<Self, DiscordError> {
        if config.bot_token.trim().is_empty() {
            return Err(DiscordError::NoToken);
        }
        Ok(Self {
            bridge,
            config: config.clone(),
        })
    }

    /// Connect to Discord and keep reconnecting whenever the gateway drops.
    ///
    /// Never returns, runs for the lifetime of the process. A per-message
    /// failure is reported in-channel by the handler; only gateway-level
    /// errors land here.
    pub async fn run(self) {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = loop {
            match self.build_client(intents).await {
                Ok(c) => break c,
                Err(e) => {
                    error!("Discord: initial connect failed ({e}), retrying in 30s");
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
            }
        };

        loop {
            info!("Discord: gateway connecting");

            if let Err(e) = client.start().await {
                warn!("Discord: gateway error ({e}), reconnecting in 5s");
            } else {
                info!("Discord: gateway stopped cleanly, reconnecting in 5s");
            }

            tokio::time::sleep(Duration::from_secs(5)).await;

            // Rebuild the client for the next attempt.
            client = loop {
                match self.build_client(intents).await {
                    Ok(c) => break c,
                    Err(e) => {
                        error!("Discord: reconnect failed ({e}), retrying in 30s");
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    }
                }
            };
        }
    }

    /// Build a fresh serenity `Client` with our event handler.
    async fn build_client(&self, intents: GatewayIntents) -> Result<Client, serenity::Error> {
        let handler = DiscordHandler::new(Arc::clone(&self.bridge), self.config.clone());

        Client::builder(&self.config.bot_token, intents)
            .event_handler(handler)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::config::AgentConfig;

    #[test]
    fn blank_token_is_rejected() {
        let bridge = Arc::new(Bridge::new(&AgentConfig {
            api_url: "http://127.0.0.1:80/api_message".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 300,
        }));
        let config = DiscordConfig {
            bot_token: "   ".to_string(),
            allowed_channels: vec![],
            command_prefix: "!".to_string(),
        };
        assert!(matches!(
            DiscordAdapter::new(&config, bridge),
            Err(DiscordError::NoToken)
        ));
    }
}
