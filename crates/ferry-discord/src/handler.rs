use std::sync::Arc;

use dashmap::DashSet;
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::{ChannelId, MessageId};
use serenity::prelude::{Context, EventHandler};
use tracing::{info, warn};

use ferry_agent::{AgentError, Bridge};
use ferry_core::config::DiscordConfig;

use crate::commands::{self, Command};
use crate::send;
use crate::typing::TypingHandle;

/// Serenity event handler wired to the agent bridge.
pub struct DiscordHandler {
    bridge: Arc<Bridge>,
    config: DiscordConfig,
    /// Channels with a request currently in flight. One outstanding agent
    /// call per channel; a second message is turned away until the reply
    /// (or error) has been posted.
    in_flight: Arc<DashSet<u64>>,
}

impl DiscordHandler {
    pub fn new(bridge: Arc<Bridge>, config: DiscordConfig) -> Self {
        Self {
            bridge,
            config,
            in_flight: Arc::new(DashSet::new()),
        }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(name = %ready.user.name, "Discord bot connected");
        if self.config.allowed_channels.is_empty() {
            info!("responding in all channels and DMs");
        } else {
            info!(channels = ?self.config.allowed_channels, "restricted to allowed channels");
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore our own messages and other bots.
        if msg.author.bot {
            return;
        }

        let channel_id = msg.channel_id.to_string();
        if !crate::allow::is_allowed(&self.config.allowed_channels, &channel_id) {
            return;
        }

        let content = msg.content.trim().to_string();
        if content.is_empty() {
            return;
        }

        // Bridge commands are answered locally, never forwarded.
        if let Some(command) = commands::parse(&self.config.command_prefix, &content) {
            let reply = match command {
                Command::Reset => commands::reset_text(self.bridge.reset(&channel_id)),
                Command::Status => commands::status_text(&self.bridge, &channel_id),
                Command::Help => commands::help_text(&self.config.command_prefix),
            };
            if let Err(e) = send::send_response(&ctx.http, msg.channel_id, &reply, Some(msg.id)).await
            {
                warn!(error = %e, channel = %channel_id, "command reply failed");
            }
            return;
        }

        // One outstanding agent call per channel.
        if !self.in_flight.insert(msg.channel_id.get()) {
            let notice = "\u{23f3} Still working on the previous message in this channel.";
            if let Err(e) = send::send_response(&ctx.http, msg.channel_id, notice, Some(msg.id)).await
            {
                warn!(error = %e, channel = %channel_id, "busy notice failed");
            }
            return;
        }

        info!(
            author = %msg.author.name,
            channel = %channel_id,
            message = %excerpt(&content),
            "forwarding to agent"
        );

        let bridge = Arc::clone(&self.bridge);
        let http = Arc::clone(&ctx.http);
        let guard = InFlightGuard {
            set: Arc::clone(&self.in_flight),
            channel: msg.channel_id.get(),
        };
        let prefix = self.config.command_prefix.clone();
        let target = msg.channel_id;
        let reply_to = msg.id;

        tokio::spawn(async move {
            let _guard = guard;
            process_message(bridge, http, target, reply_to, content, prefix).await;
        });
    }
}

/// Clears a channel's in-flight marker when dropped.
///
/// Held by the processing task, so the channel is released even when the
/// task unwinds instead of finishing normally.
struct InFlightGuard {
    set: Arc<DashSet<u64>>,
    channel: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.remove(&self.channel);
    }
}

/// Run one message through the bridge and post the reply (or error) back.
async fn process_message(
    bridge: Arc<Bridge>,
    http: Arc<serenity::http::Http>,
    channel_id: ChannelId,
    reply_to: MessageId,
    content: String,
    prefix: String,
) {
    let typing = TypingHandle::start(Arc::clone(&http), channel_id);
    let result = bridge.ask(&channel_id.to_string(), &content).await;
    typing.stop();

    let text = match result {
        Ok(reply) => {
            info!(channel = %channel_id, reply = %excerpt(&reply), "agent replied");
            reply
        }
        Err(e) => {
            warn!(error = %e, channel = %channel_id, "agent request failed");
            error_reply(&e, bridge.api_url(), &prefix)
        }
    };

    if let Err(e) = send::send_response(&http, channel_id, &text, Some(reply_to)).await {
        warn!(error = %e, channel = %channel_id, "Discord send failed");
    }
}

/// User-visible message for a failed agent round-trip.
fn error_reply(e: &AgentError, api_url: &str, prefix: &str) -> String {
    match e {
        AgentError::Timeout { secs } => format!(
            "\u{23f3} The agent took too long to respond (timeout: {secs}s). \
             Try again or use `{prefix}reset` to start fresh."
        ),
        AgentError::Transport(_) => format!(
            "\u{1f50c} Cannot connect to the agent API. Is the server running?\nTarget: `{api_url}`"
        ),
        AgentError::Auth { status } => format!(
            "\u{1f510} The agent rejected the bridge's API key (HTTP {status}). Check the configured key."
        ),
        other => format!("\u{274c} Error: {other}"),
    }
}

/// First 100 characters of `text` for log lines.
fn excerpt(text: &str) -> String {
    let head: String = text.chars().take(100).collect();
    if head.len() < text.len() {
        format!("{head}...")
    } else {
        head
    }
}
