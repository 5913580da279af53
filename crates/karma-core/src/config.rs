//! Karma configuration.
//!
//! Lives in `~/.config/karma/config.toml`. Every field has a default, so a
//! missing file (or a missing section) is not an error.
//!
//! ```toml
//! [cache]
//! capacity = 16
//!
//! [preferences]
//! path = "/home/me/.local/state/karma/prefs.json"
//!
//! [log]
//! level = "warn"
//! ```

use crate::error::{KarmaError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR: &str = "karma";
const CONFIG_FILE: &str = "config.toml";
const PREFS_FILE: &str = "prefs.json";

/// Compute cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Responses kept per session (valid: 1-256)
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

fn default_cache_capacity() -> usize {
    16
}

impl CacheConfig {
    /// Clamp capacity to the valid range (1-256)
    pub fn effective_capacity(&self) -> usize {
        self.capacity.clamp(1, 256)
    }

    pub fn capacity_was_clamped(&self) -> bool {
        self.capacity != self.effective_capacity()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
        }
    }
}

/// Preference storage settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Preferences file; defaults to the user state dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl PreferencesConfig {
    pub fn effective_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_prefs_path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KarmaConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl KarmaConfig {
    /// Load from `path`. A missing file yields defaults; a malformed one is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the default location.
    pub fn load_default() -> Result<Self> {
        Self::load(&config_path())
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| KarmaError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// `~/.config/karma/config.toml` (or `./karma/config.toml` without a home).
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// `~/.local/state/karma/prefs.json`, falling back to the data dir.
pub fn default_prefs_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(PREFS_FILE)
}
