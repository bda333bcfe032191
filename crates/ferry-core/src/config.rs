use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default bound on a single agent round-trip. The agent can be slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Top-level config (ferry.toml + FERRY_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FerryConfig {
    pub discord: DiscordConfig,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub bot_token: String,
    /// Channel IDs the bot responds in. Empty means all channels and DMs.
    #[serde(default)]
    pub allowed_channels: Vec<String>,
    /// Marker that introduces bridge commands (`!reset`, `!status`, `!help`).
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent message endpoint, e.g. `http://127.0.0.1:80/api_message`.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Value for the `X-API-KEY` header.
    pub api_key: String,
    /// Upper bound on a single request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_command_prefix() -> String {
    "!".to_string()
}
fn default_api_url() -> String {
    "http://127.0.0.1:80/api_message".to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl FerryConfig {
    /// Load config from a TOML file with FERRY_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.ferry/ferry.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: FerryConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("FERRY_").split("_"))
            .extract()
            .map_err(|e| crate::error::FerryError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot possibly work before touching the network.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.discord.bot_token.trim().is_empty() {
            return Err(crate::error::FerryError::Config(
                "discord.bot_token is not set".to_string(),
            ));
        }
        if self.agent.api_key.trim().is_empty() {
            return Err(crate::error::FerryError::Config(
                "agent.api_key is not set".to_string(),
            ));
        }
        if self.agent.timeout_secs == 0 {
            return Err(crate::error::FerryError::Config(
                "agent.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.ferry/ferry.toml", home)
}

/// Mask a secret down to its first four characters for log output.
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(MISSING)".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    let hidden = secret.chars().count().saturating_sub(4);
    format!("{}{}", visible, "*".repeat(hidden))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> FerryConfig {
        Figment::new()
            .merge(Toml::string(toml))
            .extract()
            .expect("config should parse")
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config = from_toml(
            r#"
            [discord]
            bot_token = "tok"
            [agent]
            api_key = "key"
            "#,
        );
        assert_eq!(config.discord.command_prefix, "!");
        assert!(config.discord.allowed_channels.is_empty());
        assert_eq!(config.agent.api_url, "http://127.0.0.1:80/api_message");
        assert_eq!(config.agent.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = from_toml(
            r#"
            [discord]
            bot_token = "tok"
            allowed_channels = ["111", "222"]
            command_prefix = "~"
            [agent]
            api_url = "http://localhost:8080/api_message"
            api_key = "key"
            timeout_secs = 60
            "#,
        );
        assert_eq!(config.discord.allowed_channels, vec!["111", "222"]);
        assert_eq!(config.discord.command_prefix, "~");
        assert_eq!(config.agent.timeout_secs, 60);
    }

    #[test]
    fn empty_token_fails_validation() {
        let config = from_toml(
            r#"
            [discord]
            bot_token = ""
            [agent]
            api_key = "key"
            "#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_api_key_fails_validation() {
        let config = from_toml(
            r#"
            [discord]
            bot_token = "tok"
            [agent]
            api_key = "  "
            "#,
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn mask_secret_keeps_first_four_chars() {
        assert_eq!(mask_secret("abcdefgh"), "abcd****");
        assert_eq!(mask_secret("ab"), "ab");
        assert_eq!(mask_secret(""), "(MISSING)");
    }
}
