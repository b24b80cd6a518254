/// Config schema types (discord account, storage, per-feature settings, emojis).
use std::{collections::HashMap, path::PathBuf};

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Environment variable consulted when `discord.token` is empty.
pub const TOKEN_ENV_VAR: &str = "DISCORD_BOT_TOKEN";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub discord: DiscordConfig,
    pub storage: StorageConfig,
    pub snipe: SnipeConfig,
    pub presence: PresenceConfig,
    pub emojis: EmojiConfig,
}

impl WardenConfig {
    /// Reject values that would make the bot misbehave at runtime.
    pub fn validate(&self) -> crate::Result<()> {
        let prefix = &self.discord.prefix;
        if prefix.trim().is_empty() {
            return Err(crate::Error::invalid(
                "discord.prefix",
                "must not be empty or whitespace",
            ));
        }
        if prefix.chars().any(char::is_whitespace) {
            return Err(crate::Error::invalid(
                "discord.prefix",
                format!("{prefix:?} must not contain whitespace"),
            ));
        }
        Ok(())
    }
}

/// Discord bot account.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token. Falls back to `DISCORD_BOT_TOKEN` when empty.
    #[serde(serialize_with = "serialize_secret")]
    pub token: Secret<String>,

    /// Command prefix, e.g. `,` for `,snipe 2`.
    pub prefix: String,

    /// Messages kept in the gateway cache per channel. Deleted messages can
    /// only be recorded while they are still cached.
    pub message_cache_size: usize,
}

impl DiscordConfig {
    /// Resolve the bot token, preferring the config value over the environment.
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(|name| std::env::var(name).ok())
    }

    fn resolve_token_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        let configured = self.token.expose_secret().trim();
        if !configured.is_empty() {
            return Some(configured.to_string());
        }
        lookup(TOKEN_ENV_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"[REDACTED]")
            .field("prefix", &self.prefix)
            .field("message_cache_size", &self.message_cache_size)
            .finish()
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
            prefix: ",".into(),
            message_cache_size: 500,
        }
    }
}

/// Where registry documents live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `afk.json`, `deleted.json` and `lock.json`.
    /// Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipeConfig {
    /// Deleted messages kept per channel, newest first.
    pub capacity: usize,
}

impl Default for SnipeConfig {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Upper bound on resolving the author of a replied-to message.
    pub reply_fetch_timeout_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            reply_fetch_timeout_secs: 5,
        }
    }
}

/// Custom emoji ids keyed by notice slot (`approve`, `warn`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct EmojiConfig(pub HashMap<String, String>);

impl EmojiConfig {
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.0
            .get(slot)
            .map(String::as_str)
            .filter(|id| !id.trim().is_empty())
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
