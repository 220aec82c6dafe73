use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use aviowiki::DEFAULT_SEARCH_URL;
use serde::{Deserialize, Serialize};

use crate::search::{SearchOptions, DEFAULT_DEBOUNCE};

/// Prefix for environment overrides, e.g. `JET_BOOKING_SEARCH_URL`.
pub const ENV_PREFIX: &str = "JET_BOOKING";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Airport search endpoint, queried as `<search_url>?query=...`
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Quiet period after the last keystroke before searching.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            debounce_ms: default_debounce_ms(),
            log_level: default_log_level(),
        }
    }
}

impl BookingConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("jet-booking")
            .join("config.toml"))
    }

    /// Load config from disk with environment overrides applied on top.
    /// Missing file or keys fall back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        settings
            .try_deserialize::<Self>()
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}
