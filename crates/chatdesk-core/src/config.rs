use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/agent";
pub const DEFAULT_AGENT_ID: &str = "burnlab-support";
pub const DEFAULT_AGENT_NAME: &str = "Burnlab Support Agent";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENDPOINT_ENV: &str = "CHATDESK_ENDPOINT";
pub const AGENT_ID_ENV: &str = "CHATDESK_AGENT_ID";

/// Prompts offered before the first reply and whenever a reply suggests none.
pub fn default_chips() -> Vec<String> {
    [
        "How does Burnlab work?",
        "Pricing & Plans",
        "Book a Demo",
        "Customer Reviews",
        "Integration Options",
    ]
    .iter()
    .map(|chip| chip.to_string())
    .collect()
}

/// User configuration. Every field is optional; the accessors below resolve
/// the effective value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub endpoint: Option<String>,
    pub agent_id: Option<String>,
    pub agent_name: Option<String>,
    pub default_chips: Option<Vec<String>>,
    pub request_timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Apply `CHATDESK_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(agent_id) = lookup(AGENT_ID_ENV).filter(|v| !v.is_empty()) {
            self.agent_id = Some(agent_id);
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn agent_id(&self) -> &str {
        self.agent_id.as_deref().unwrap_or(DEFAULT_AGENT_ID)
    }

    pub fn agent_name(&self) -> &str {
        self.agent_name.as_deref().unwrap_or(DEFAULT_AGENT_NAME)
    }

    pub fn chips(&self) -> Vec<String> {
        self.default_chips
            .clone()
            .filter(|chips| !chips.is_empty())
            .unwrap_or_else(default_chips)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("chatdesk")
                .join("chatdesk.log")
        })
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chatdesk").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(config, Config::new());
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.agent_name(), DEFAULT_AGENT_NAME);
        assert_eq!(config.chips(), default_chips());
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            endpoint: Some("http://agent.internal/chat".to_string()),
            default_chips: Some(vec!["Hello".to_string()]),
            request_timeout_secs: Some(5),
            ..Config::new()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.chips(), vec!["Hello"]);
        assert_eq!(loaded.agent_id(), DEFAULT_AGENT_ID);
    }

    #[test]
    fn test_partial_file_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"agent_name": "Helper"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.agent_name(), "Helper");
        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_empty_chip_list_uses_defaults() {
        let config = Config {
            default_chips: Some(Vec::new()),
            ..Config::new()
        };
        assert_eq!(config.chips(), default_chips());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = Config {
            endpoint: Some("http://from-file".to_string()),
            ..Config::new()
        };
        config.apply_overrides(|key| match key {
            ENDPOINT_ENV => Some("http://from-env".to_string()),
            AGENT_ID_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.endpoint(), "http://from-env");
        assert_eq!(config.agent_id(), DEFAULT_AGENT_ID);
    }
}
