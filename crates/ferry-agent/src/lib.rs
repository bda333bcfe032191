pub mod client;
pub mod context;
pub mod error;

pub use client::{AgentClient, AgentReply};
pub use context::ContextMap;
pub use error::AgentError;

use ferry_core::config::AgentConfig;
use tracing::{debug, info};

/// Channel-facing facade over the agent client and the context map.
///
/// One instance is shared by every event handler; all methods take `&self`.
pub struct Bridge {
    client: AgentClient,
    contexts: ContextMap,
    api_url: String,
    timeout_secs: u64,
}

impl Bridge {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            client: AgentClient::new(config),
            contexts: ContextMap::new(),
            api_url: config.api_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// Forward one user message to the agent and return its reply text.
    ///
    /// Resolves (or mints) the channel's context id, blocks on the HTTP
    /// round-trip, then remembers the context id the agent echoed back so
    /// the conversation continues across messages.
    pub async fn ask(&self, channel_id: &str, message: &str) -> Result<String, AgentError> {
        let context_id = self.contexts.resolve(channel_id);
        debug!(channel = %channel_id, context = %context_id, "forwarding message to agent");

        let reply = self.client.send(&context_id, message).await?;
        self.remember_context(channel_id, &reply);

        Ok(reply.into_text())
    }

    /// Discard the channel's context mapping. Returns `true` when one existed.
    pub fn reset(&self, channel_id: &str) -> bool {
        let removed = self.contexts.reset(channel_id);
        if removed {
            info!(channel = %channel_id, "context reset");
        }
        removed
    }

    /// Current context id for a channel, if any. Used by the status command.
    pub fn context_of(&self, channel_id: &str) -> Option<String> {
        self.contexts.get(channel_id)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// The agent owns the canonical context id: when its reply carries one,
    /// it replaces whatever we minted locally.
    fn remember_context(&self, channel_id: &str, reply: &AgentReply) {
        if let Some(ctx) = reply.context_id.as_deref() {
            if !ctx.is_empty() {
                self.contexts.store(channel_id, ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bridge() -> Bridge {
        Bridge::new(&AgentConfig {
            api_url: "http://127.0.0.1:80/api_message".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 300,
        })
    }

    fn reply(context_id: Option<&str>, response: &str) -> AgentReply {
        AgentReply {
            context_id: context_id.map(String::from),
            response: response.to_string(),
        }
    }

    #[test]
    fn agent_context_replaces_minted_one() {
        let bridge = test_bridge();
        let minted = bridge.contexts.resolve("42");

        bridge.remember_context("42", &reply(Some("ctx-from-agent"), "hi"));
        assert_eq!(bridge.context_of("42").as_deref(), Some("ctx-from-agent"));
        assert_ne!(bridge.context_of("42"), Some(minted));
    }

    #[test]
    fn missing_context_leaves_mapping_untouched() {
        let bridge = test_bridge();
        let minted = bridge.contexts.resolve("42");

        bridge.remember_context("42", &reply(None, "hi"));
        assert_eq!(bridge.context_of("42"), Some(minted.clone()));

        bridge.remember_context("42", &reply(Some(""), "hi"));
        assert_eq!(bridge.context_of("42"), Some(minted));
    }

    #[test]
    fn reset_reports_whether_a_mapping_existed() {
        let bridge = test_bridge();
        assert!(!bridge.reset("42"));

        bridge.contexts.resolve("42");
        assert!(bridge.reset("42"));
        assert_eq!(bridge.context_of("42"), None);
    }
}
