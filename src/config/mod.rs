//! Configuration management for gpuscout.
//!
//! Configuration is read from `~/.config/gpuscout/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crawler::DEFAULT_MAX_PAGES;
use crate::enrichment::EnrichmentConfig;
use crate::normalizer::variation::MultiAxisPolicy;
use crate::scraper::ScraperConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub crawl: CrawlConfig,
    pub enrichment: EnrichmentConfig,
}

/// What to crawl and how far.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Site name from the built-in table
    pub site: String,
    pub max_pages: usize,
    pub multi_axis_policy: MultiAxisPolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            site: "bermor".to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            multi_axis_policy: MultiAxisPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/gpuscout/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("gpuscout").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# gpuscout configuration

[scraper]
# Run browser in headless mode (no visible window)
headless = true

# Page load timeout in seconds
timeout_secs = 60

# Wait time after page load for dynamic content (milliseconds)
wait_after_load_ms = 1000

# Maximum concurrent product tabs
max_concurrency = 5

# After picking a variation option, how long to wait for the price to change
price_settle_timeout_ms = 6000
price_poll_interval_ms = 100

# Axes with at least this many options are priced by selecting each one
probe_threshold = 3

window_width = 1440
window_height = 1000

[crawl]
# Catalog to crawl (see `gpuscout sites`)
site = "bermor"

# Stop after this many listing pages
max_pages = 50

# Products with several variation axes:
# - "independent": every option of every axis becomes its own listing
# - "primary_only": only the first axis is expanded
multi_axis_policy = "independent"

[enrichment]
# Ask a completion service for specs the title doesn't state
enabled = false
endpoint = "https://api.openai.com/v1/chat/completions"
model = "gpt-4o-mini"

# Environment variable holding the API key
api_key_env = "OPENAI_API_KEY"
timeout_secs = 30
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
