//! Bootstrap configuration loading
//!
//! The TOML file is the lowest-priority explicit configuration source.
//! Command-line flags and environment variables override it; built-in
//! defaults fill whatever remains unset. Every field is optional so callers
//! can tell "not configured" apart from "configured to the default".

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the per-user configuration directory
pub const CONFIG_DIR_NAME: &str = "moviedb";

/// Name of the configuration file inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Parsed contents of the TOML configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    pub omdb: OmdbSection,
    pub source: SourceSection,
    pub destination: DestinationSection,
    pub cache: CacheSection,
    pub logging: LoggingConfig,
}

/// `[omdb]` - external metadata service
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OmdbSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Pause after each service call, in milliseconds
    pub request_delay_ms: Option<u64>,
}

/// `[source]` - input flat files
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSection {
    pub movies_path: Option<PathBuf>,
    pub ratings_path: Option<PathBuf>,
}

/// `[destination]` - relational store
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DestinationSection {
    pub url: Option<String>,
    /// One of `fail`, `append`, `replace`
    pub load_mode: Option<String>,
}

/// `[cache]` - optional fetch cache
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheSection {
    pub path: Option<PathBuf>,
    pub ttl_days: Option<u32>,
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read TOML failed ({}): {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Default configuration file location for the platform
///
/// `~/.config/moviedb/config.toml` on Linux, the platform equivalent elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the bootstrap configuration
///
/// An explicitly requested file must exist. When no file is requested the
/// platform default location is tried, and its absence yields an empty
/// configuration so the caller falls through to flags, environment and
/// built-in defaults.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        info!("Loading configuration from {}", path.display());
        return TomlConfig::from_file(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading configuration from {}", path.display());
            TomlConfig::from_file(&path)
        }
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(TomlConfig::default())
        }
        None => {
            debug!("Could not determine config directory, using defaults");
            Ok(TomlConfig::default())
        }
    }
}
