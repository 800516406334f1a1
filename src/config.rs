use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

pub const DEFAULT_RESPONSE_DELAY_MS: u64 = 1000;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Simulated advice-generation delay in milliseconds.
    pub response_delay_ms: Option<u64>,
    /// Tracing filter, e.g. "advisor=debug". ADVISOR_LOG overrides this.
    pub log_filter: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            response_delay_ms: None,
            log_filter: None,
        }
    }

    /// Loads the config, writing a default file on first run so there is
    /// something on disk to edit. Any failure falls back to defaults.
    pub fn load_or_default() -> Self {
        let Ok(path) = Self::get_config_path() else {
            return Self::new();
        };
        if !path.exists() {
            let config = Self::new();
            let _ = config.save_to(&path);
            return config;
        }
        Self::load_from(&path).unwrap_or_else(|_| Self::new())
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms.unwrap_or(DEFAULT_RESPONSE_DELAY_MS))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("advisor").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.response_delay_ms, None);
        assert_eq!(config.response_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::new();
        config.response_delay_ms = Some(250);
        config.log_filter = Some("advisor=trace".to_string());
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.response_delay(), Duration::from_millis(250));
        assert_eq!(reloaded.log_filter.as_deref(), Some("advisor=trace"));
    }
}
