use crate::error::{NessbookError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Overrides the data directory (config, preferences, session).
pub const HOME_ENV: &str = "NESSBOOK_HOME";
/// Overrides `api_url` without touching the config file.
pub const API_URL_ENV: &str = "NESSBOOK_API_URL";

/// Configuration for nessbook, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NessbookConfig {
    /// Root of the NessBook API; `/api` is appended when missing.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for NessbookConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl NessbookConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(NessbookError::Io)?;
        let config: NessbookConfig =
            serde_json::from_str(&content).map_err(NessbookError::Serialization)?;
        Ok(config)
    }

    /// Applies environment overrides on top of the stored values.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        self
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(NessbookError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(NessbookError::Serialization)?;
        fs::write(config_path, content).map_err(NessbookError::Io)?;
        Ok(())
    }

    /// Value of a config key, as shown to users.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api-url" => Ok(self.api_url.clone()),
            "timeout-secs" => Ok(self.timeout_secs.to_string()),
            other => Err(unknown_key(other)),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api-url" => {
                let value = value.trim();
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(NessbookError::Config(format!(
                        "api-url must start with http:// or https://, got {:?}",
                        value
                    )));
                }
                self.api_url = value.trim_end_matches('/').to_string();
            }
            "timeout-secs" => {
                self.timeout_secs = value
                    .trim()
                    .parse()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        NessbookError::Config(format!(
                            "timeout-secs must be a positive number, got {:?}",
                            value
                        ))
                    })?;
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["api-url", "timeout-secs"]
    }
}

fn unknown_key(key: &str) -> NessbookError {
    NessbookError::Config(format!(
        "unknown config key {:?} (known: {})",
        key,
        NessbookConfig::keys().join(", ")
    ))
}

/// Where nessbook keeps its local files.
#[derive(Debug, Clone)]
pub struct NessbookPaths {
    pub data_dir: PathBuf,
}

impl NessbookPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// `$NESSBOOK_HOME`, else the platform data directory.
    pub fn from_env() -> Result<Self> {
        if let Ok(home) = std::env::var(HOME_ENV) {
            if !home.trim().is_empty() {
                return Ok(Self::new(PathBuf::from(home)));
            }
        }
        let dirs = ProjectDirs::from("com", "nessbook", "nessbook").ok_or_else(|| {
            NessbookError::Config("could not determine a data directory".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NessbookConfig::default();
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = NessbookConfig::load(dir.path().join("absent")).unwrap();
        assert_eq!(config, NessbookConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = NessbookConfig::default();
        config.set("api-url", "https://books.example/").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = NessbookConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.api_url, "https://books.example");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"timeout_secs": 5}"#).unwrap();

        let loaded = NessbookConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.timeout_secs, 5);
        assert_eq!(loaded.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = NessbookConfig::default();
        assert!(config.set("api-url", "books.example").is_err());
        assert!(config.set("timeout-secs", "0").is_err());
        assert!(config.set("timeout-secs", "soon").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, NessbookConfig::default());
    }

    #[test]
    fn test_get_known_keys() {
        let config = NessbookConfig::default();
        assert_eq!(config.get("timeout-secs").unwrap(), "30");
        assert!(config.get("nope").is_err());
    }
}
