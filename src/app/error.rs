use thiserror::Error;

use crate::config::ConfigError;
use crate::normalizer::PriceError;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Browser process or listing page lost; ends the run
    #[error("Browser error: {0}")]
    Browser(String),

    /// A single product page failed to load or read
    #[error("Navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    #[error("Enrichment error: {0}")]
    Enrichment(String),

    #[error("Unknown site: {0}")]
    UnknownSite(String),

    #[error("GPU not found: {0}")]
    GpuNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl ScoutError {
    /// Resource-level failures that must stop a crawl.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScoutError::Browser(_) | ScoutError::Database(_) | ScoutError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
