use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{WeatherClient, transport::TransportOptions};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
///
/// [transport]
/// timeout = 5
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Forwarded untouched to the HTTP transport.
    #[serde(default, skip_serializing_if = "TransportOptions::is_empty")]
    pub transport: TransportOptions,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "amap-weather", "amap-weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the API key, if one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Set a transport option; `None` removes it.
    pub fn set_transport_option(&mut self, key: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.transport.insert(key, value);
            }
            None => {
                self.transport.remove(key);
            }
        }
    }

    /// Build a client from the stored key and transport options.
    pub fn client(&self) -> Result<WeatherClient> {
        let api_key = self.api_key().ok_or_else(|| {
            anyhow!(
                "No AMap API key configured.\n\
                 Hint: run `amap-weather configure` or pass `--key <KEY>`."
            )
        })?;

        let mut client = WeatherClient::new(api_key);
        client.configure_transport(self.transport.clone());
        Ok(client)
    }
}
