//! Configuration loading and env substitution.
//!
//! Config files: `warden.toml`, `warden.yaml`, `warden.yml` or `warden.json`
//! Searched in `./` then `~/.config/warden/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{config_dir, data_dir, discover_and_load, load_config, set_data_dir},
    schema::{
        DiscordConfig, EmojiConfig, PresenceConfig, SnipeConfig, StorageConfig, WardenConfig,
    },
};
