use crate::types::{OptionTable, OPTIONS_GROUP};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bindmap.toml";

/// Errors that can occur while loading or querying configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find {name} option in config file")]
    MissingOption { name: String },

    #[error("Invalid value '{value}' for option {name}")]
    InvalidValue { name: String, value: String },

    #[error("Option group '{group}' must be an array of strings")]
    InvalidGroup { group: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Config file already exists at {0}")]
    ConfigExists(PathBuf),
}

/// Loads and initializes bindmap config files.
///
/// The file is TOML whose top-level keys are option groups, each holding an
/// array of raw `key = value` strings:
///
/// ```toml
/// Options = ["AssemblyName = SlimDX", "Version = 2.0"]
/// ```
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    options: OptionTable,
}

impl ConfigManager {
    /// Get the default config path (./bindmap.toml)
    pub fn config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let options = parse_options(&contents)?;
        debug!(path = %path.display(), groups = options.groups().count(), "loaded config");

        Ok(Self {
            config_path: path.to_path_buf(),
            options,
        })
    }

    /// Write a starter config file and load it
    pub fn init_at(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Err(ConfigError::ConfigExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let options = default_options();
        fs::write(path, toml::to_string_pretty(&options)?)?;

        Ok(Self {
            config_path: path.to_path_buf(),
            options,
        })
    }

    /// Path the config was loaded from
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    pub fn into_options(self) -> OptionTable {
        self.options
    }
}

/// Parse an option table from TOML text
pub fn parse_options(contents: &str) -> Result<OptionTable, ConfigError> {
    let table: toml::Table = toml::from_str(contents)?;
    let mut options = OptionTable::new();

    for (group, value) in table {
        let toml::Value::Array(items) = value else {
            return Err(ConfigError::InvalidGroup { group });
        };

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            match item {
                toml::Value::String(entry) => entries.push(entry),
                _ => return Err(ConfigError::InvalidGroup { group }),
            }
        }
        options.set_group(group, entries);
    }

    Ok(options)
}

fn default_options() -> OptionTable {
    let mut options = OptionTable::new();
    options.push(OPTIONS_GROUP, "AssemblyName = SlimDX");
    options.push(OPTIONS_GROUP, "CaseInsensitive = false");
    options
}
