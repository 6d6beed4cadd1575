use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// One dealer page to scrape for a spot price.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SpotPageConfig {
    pub url: String,
    /// Text to locate on the page; the first figure after it is the price.
    /// Falls back to the provider default when absent.
    pub marker: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    pub gold: Option<SpotPageConfig>,
    pub silver: Option<SpotPageConfig>,
}

impl ProvidersConfig {
    pub fn is_empty(&self) -> bool {
        self.gold.is_none() && self.silver.is_none()
    }
}

/// The notional holding shown by `status`. Not the reference portfolio used
/// for peak comparison, which is always 1 g of each metal.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PortfolioConfig {
    pub gold_grams: f64,
    pub silver_grams: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        PortfolioConfig {
            gold_grams: 1.0,
            silver_grams: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub store_path: Option<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "ingot", "ingot")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    /// Path of the JSON history file, either from the config or under the
    /// platform data directory.
    pub fn history_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.store_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "ingot", "ingot")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("price_history.json"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
