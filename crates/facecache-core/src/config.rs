//! Application configuration management.
//!
//! The only setting is the backend base URL. It is read from
//! `~/.config/facecache/config.json` and can be overridden by the
//! `FACECACHE_API_BASE_URL` environment variable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "facecache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the configured base URL
pub const BASE_URL_ENV: &str = "FACECACHE_API_BASE_URL";

/// Longest base URL shown verbatim before it is shortened for display
const MAX_DISPLAY_URL_LENGTH: usize = 40;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,

    /// Value of `FACECACHE_API_BASE_URL` at load time. Never written back.
    #[serde(skip)]
    env_api_base_url: Option<String>,
}

impl Config {
    /// Load the config file (defaults when missing) and apply the environment override.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };
        Ok(config.with_env_override(std::env::var(BASE_URL_ENV).ok()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn with_env_override(mut self, value: Option<String>) -> Self {
        self.env_api_base_url = value;
        self
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Effective base URL: the environment wins over the file, blank counts as unset.
    pub fn api_base_url(&self) -> Option<String> {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        non_blank(&self.env_api_base_url).or_else(|| non_blank(&self.api_base_url))
    }

    pub fn has_api_config(&self) -> bool {
        self.api_base_url().is_some()
    }

    /// Base URL shortened for a status line.
    pub fn display_api_url(&self) -> String {
        match self.api_base_url() {
            None => "Not configured".to_string(),
            Some(url) if url.chars().count() > MAX_DISPLAY_URL_LENGTH => {
                let head: String = url.chars().take(MAX_DISPLAY_URL_LENGTH - 3).collect();
                format!("{}...", head)
            }
            Some(url) => url,
        }
    }
}
