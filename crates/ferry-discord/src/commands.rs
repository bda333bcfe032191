//! Text commands: `!reset`, `!status`, `!help`.
//!
//! The prefix is configurable; matching is case-insensitive. Anything else
//! starting with the prefix is not a command and goes to the agent verbatim.

use ferry_agent::Bridge;

/// A recognized bridge command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    Status,
    Help,
}

/// Match `content` against the known commands.
pub fn parse(prefix: &str, content: &str) -> Option<Command> {
    let lower = content.to_lowercase();
    let rest = lower.strip_prefix(&prefix.to_lowercase())?;
    match rest {
        "reset" => Some(Command::Reset),
        "status" => Some(Command::Status),
        "help" => Some(Command::Help),
        _ => None,
    }
}

/// Reply for `!reset`.
pub fn reset_text(had_context: bool) -> String {
    if had_context {
        "\u{1f504} Conversation reset. Starting fresh.".to_string()
    } else {
        "\u{1f504} No conversation to reset. The next message starts a fresh one.".to_string()
    }
}

/// Reply for `!status`.
pub fn status_text(bridge: &Bridge, channel_id: &str) -> String {
    let context = bridge
        .context_of(channel_id)
        .unwrap_or_else(|| "(none)".to_string());
    format!(
        "\u{1f916} **Bridge status**\n\
         \u{2022} API: `{}`\n\
         \u{2022} Context: `{}`\n\
         \u{2022} Timeout: {}s",
        bridge.api_url(),
        context,
        bridge.timeout_secs()
    )
}

/// Reply for `!help`.
pub fn help_text(prefix: &str) -> String {
    format!(
        "\u{1f916} **Agent bridge**\n\
         Send any message to chat with the agent.\n\n\
         **Commands:**\n\
         \u{2022} `{p}reset` - start a new conversation\n\
         \u{2022} `{p}status` - show connection status\n\
         \u{2022} `{p}help` - show this message",
        p = prefix
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::config::AgentConfig;

    #[test]
    fn known_commands_parse() {
        assert_eq!(parse("!", "!reset"), Some(Command::Reset));
        assert_eq!(parse("!", "!status"), Some(Command::Status));
        assert_eq!(parse("!", "!help"), Some(Command::Help));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(parse("!", "!RESET"), Some(Command::Reset));
        assert_eq!(parse("!", "!Status"), Some(Command::Status));
    }

    #[test]
    fn custom_prefix_is_honored() {
        assert_eq!(parse("~", "~reset"), Some(Command::Reset));
        assert_eq!(parse("~", "!reset"), None);
    }

    #[test]
    fn unknown_prefixed_text_is_not_a_command() {
        assert_eq!(parse("!", "!frobnicate"), None);
        assert_eq!(parse("!", "!reset now"), None);
        assert_eq!(parse("!", "hello"), None);
    }

    #[test]
    fn status_shows_context_or_placeholder() {
        let bridge = Bridge::new(&AgentConfig {
            api_url: "http://127.0.0.1:80/api_message".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 300,
        });

        let before = status_text(&bridge, "42");
        assert!(before.contains("(none)"));
        assert!(before.contains("http://127.0.0.1:80/api_message"));
        assert!(before.contains("300s"));
    }

    #[test]
    fn help_mentions_every_command_with_prefix() {
        let text = help_text("~");
        assert!(text.contains("~reset"));
        assert!(text.contains("~status"));
        assert!(text.contains("~help"));
    }
}
