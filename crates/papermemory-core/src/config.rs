//! Configuration for the memory view and the Anki bridge.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anki::{DEFAULT_ANKI_TIMEOUT, DEFAULT_ANKI_URL};
use crate::debounce::DEFAULT_SEARCH_DEBOUNCE;
use crate::pagination::{DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THROTTLE};
use crate::sort::{SortDirection, SortKey};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Rows rendered per page
    pub page_size: usize,
    /// Delay before a search keystroke recomputes the filter
    pub search_debounce_ms: u64,
    /// Minimum delay between two scroll-proximity checks
    pub scroll_throttle_ms: u64,
    /// Sort applied when the memory opens
    pub default_sort_key: SortKey,
    pub default_sort_direction: SortDirection,
    /// Number of tag suggestions offered while editing
    pub tag_suggestion_limit: usize,
    pub anki: AnkiConfig,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE.as_millis() as u64,
            scroll_throttle_ms: DEFAULT_SCROLL_THROTTLE.as_millis() as u64,
            default_sort_key: SortKey::LastOpenDate,
            default_sort_direction: SortDirection::Descending,
            tag_suggestion_limit: 10,
            anki: AnkiConfig::default(),
        }
    }
}

/// Anki bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnkiConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub deck_name: String,
    pub model_name: String,
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ANKI_URL.to_string(),
            timeout_secs: DEFAULT_ANKI_TIMEOUT.as_secs(),
            deck_name: "PaperMemory".to_string(),
            model_name: "Basic".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Value out of range: {0}")]
    OutOfRange(String),
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Could not serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),
}

impl MemoryConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn scroll_throttle(&self) -> Duration {
        Duration::from_millis(self.scroll_throttle_ms)
    }

    /// `<config dir>/papermemory/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("papermemory").join("config.toml"))
    }

    /// Load and validate a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::OutOfRange(
                "page_size must be positive".to_string(),
            ));
        }
        if self.anki.timeout_secs == 0 {
            return Err(ConfigError::OutOfRange(
                "anki.timeout_secs must be positive".to_string(),
            ));
        }
        if self.anki.deck_name.trim().is_empty() {
            return Err(ConfigError::OutOfRange(
                "anki.deck_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
