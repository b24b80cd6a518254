use std::{
    path::{Path, PathBuf},
    sync::RwLock,
};

use tracing::{debug, warn};

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::WardenConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["warden.toml", "warden.yaml", "warden.yml", "warden.json"];

static DATA_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> Result<WardenConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::read(path, e))?;
    let raw = substitute_env(&raw);
    let config = parse_config(&raw, path)?;
    config.validate()?;
    Ok(config)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./warden.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/warden/warden.{toml,yaml,yml,json}` (user-global)
///
/// Returns `WardenConfig::default()` if no config file is found.
pub fn discover_and_load() -> WardenConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    WardenConfig::default()
}

fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let config_dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| config_dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/warden/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "warden").map(|d| d.config_dir().to_path_buf())
}

/// Override the data directory for the rest of the process (CLI `--data-dir`).
pub fn set_data_dir(dir: PathBuf) {
    let mut guard = DATA_DIR_OVERRIDE
        .write()
        .unwrap_or_else(|e| e.into_inner());
    *guard = Some(dir);
}

/// Resolve the directory registry documents are stored in.
///
/// Precedence: [`set_data_dir`] override, `storage.data_dir`, the platform
/// data dir, then the working directory.
pub fn data_dir(config: &WardenConfig) -> PathBuf {
    let overridden = DATA_DIR_OVERRIDE
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone();
    overridden
        .or_else(|| config.storage.data_dir.clone())
        .or_else(|| {
            directories::ProjectDirs::from("", "", "warden").map(|d| d.data_dir().to_path_buf())
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

fn parse_config(raw: &str, path: &Path) -> Result<WardenConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        other => Err(Error::unsupported_format(other)),
    }
}
