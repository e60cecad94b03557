use crate::domain::entities::ProfileDescriptor;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the settings hive location
pub const STORE_ENV: &str = "CUSTOM_FSI_STORE";

const APP_DIR: &str = "custom-fsi";
const CONFIG_FILE: &str = "config.json";
const HIVE_FILE: &str = "registry.json";

/// Optional user configuration, read from `config.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the settings hive lives
    pub store_path: Option<PathBuf>,
    /// Profiles declared in addition to the built-in ones
    pub profiles: Vec<ProfileDescriptor>,
}

impl Config {
    /// Loads the configuration. An explicit path must exist; the default
    /// location is used only when present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), extra_profiles = config.profiles.len(), "loaded config");
        Ok(config)
    }

    /// Picks the hive location: flag, then environment, then config, then
    /// the per-user configuration directory
    pub fn store_path(&self, flag: Option<&Path>, env: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = env.filter(|value| !value.trim().is_empty()) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.store_path {
            return Ok(path.clone());
        }
        app_dir()
            .map(|dir| dir.join(HIVE_FILE))
            .ok_or_else(|| anyhow!("Could not determine the user configuration directory"))
    }
}

fn app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

fn default_config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(CONFIG_FILE))
}
