use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const KEYS: [&str; 3] = ["seed_file", "export_dir", "log_file"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// CSV or spreadsheet loaded as the starting projects instead of the built-in set.
    pub seed_file: Option<String>,
    pub export_dir: String,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_file: None,
            export_dir: ".".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Loads the user's config; a missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_config_file_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&get_config_file_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content =
            toml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(config_path, content).map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "seed_file" => Ok(self.seed_file.clone().unwrap_or_default()),
            "export_dir" => Ok(self.export_dir.clone()),
            "log_file" => Ok(self.log_file.clone().unwrap_or_default()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// An empty value clears optional keys and resets `export_dir`.
    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        let optional = if value.trim().is_empty() { None } else { Some(value) };
        match key {
            "seed_file" => self.seed_file = optional,
            "export_dir" => {
                self.export_dir = optional.unwrap_or_else(|| Config::default().export_dir)
            }
            "log_file" => self.log_file = optional,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        match &self.log_file {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::data_local_dir().map(|dir| dir.join("kpiboard").join("kpiboard.log")),
        }
    }
}

fn get_config_file_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    Ok(config_dir.join("kpiboard").join("config.toml"))
}

#[derive(Debug)]
pub enum ConfigError {
    ConfigDirNotFound,
    UnknownKey(String),
    ReadError(String),
    WriteError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not find config directory")
            }
            ConfigError::UnknownKey(key) => {
                write!(
                    f,
                    "Unknown configuration key '{}'. Supported keys: {}",
                    key,
                    KEYS.join(", ")
                )
            }
            ConfigError::ReadError(msg) => {
                write!(f, "Failed to read config file: {}", msg)
            }
            ConfigError::WriteError(msg) => {
                write!(f, "Failed to write config file: {}", msg)
            }
            ConfigError::ParseError(msg) => {
                write!(f, "Failed to parse config file: {}", msg)
            }
            ConfigError::SerializeError(msg) => {
                write!(f, "Failed to serialize config: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
