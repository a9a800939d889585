use crate::cleaning::Vocabulary;
use crate::scrapers::types::CollectorConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "scout.json";

/// Fixed file locations for the two stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_file: PathBuf,
    pub clean_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_file: PathBuf::from("data/raw_listings.csv"),
            clean_file: PathBuf::from("data/clean_listings.csv"),
        }
    }
}

/// Cleaning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    pub vocabulary: Vocabulary,
    /// Earliest plausible model year
    pub min_year: i32,
    /// Rows priced below this are dropped
    pub min_price: Option<f64>,
    /// Rows priced above this are dropped
    pub max_price: Option<f64>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            min_year: 1930,
            min_price: None,
            max_price: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub paths: PathsConfig,
    pub collector: CollectorConfig,
    pub cleaner: CleanerConfig,
}

impl ScoutConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file just means defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!("No {} found, using built-in defaults", path.display());
            return Ok(Self::default());
        }

        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
