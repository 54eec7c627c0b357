use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::HarvestError;
use crate::layout::Layout;

pub const DEFAULT_CONFIG_FILE: &str = "imls-harvest.json";
pub const DEFAULT_ROOT: &str = "data/imls";
pub const DEFAULT_CATALOG_FILE: &str = "imls-gov.json";
pub const DEFAULT_LOG_FILE: &str = "log.txt";
pub const DEFAULT_HARVEST_URL_PREFIX: &str = "https://catalog.data.gov/harvest/object/";
pub const DEFAULT_COOLDOWN_SECS: u64 = 1;

/// Optional on-disk overrides; every field falls back to the built-in default.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub catalog_file: Option<String>,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub harvest_url_prefix: Option<String>,
    #[serde(default)]
    pub cooldown_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub root: Utf8PathBuf,
    pub catalog_file: String,
    pub log_file: String,
    pub harvest_url_prefix: String,
    pub cooldown: Duration,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        ConfigLoader::resolve_config(Config::default())
    }
}

impl HarvestConfig {
    pub fn layout(&self) -> Layout {
        Layout::new(self.root.clone(), self.harvest_url_prefix.clone())
    }

    pub fn catalog_path(&self) -> Utf8PathBuf {
        self.root.join(&self.catalog_file)
    }

    pub fn log_path(&self) -> Utf8PathBuf {
        self.root.join(&self.log_file)
    }

    /// Switches to a per-run `log-<YYYYmmdd-HHMMSS>.txt` file name.
    pub fn use_timestamped_log(&mut self) {
        self.log_file = format!("log-{}.txt", Local::now().format("%Y%m%d-%H%M%S"));
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// An explicit path must exist; without one, `imls-harvest.json` is read only if present.
    pub fn resolve(path: Option<&str>) -> Result<HarvestConfig, HarvestError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(HarvestConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| HarvestError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| HarvestError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> HarvestConfig {
        HarvestConfig {
            root: Utf8PathBuf::from(config.root.unwrap_or_else(|| DEFAULT_ROOT.to_string())),
            catalog_file: config
                .catalog_file
                .unwrap_or_else(|| DEFAULT_CATALOG_FILE.to_string()),
            log_file: config
                .log_file
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            harvest_url_prefix: config
                .harvest_url_prefix
                .unwrap_or_else(|| DEFAULT_HARVEST_URL_PREFIX.to_string()),
            cooldown: Duration::from_secs(config.cooldown_secs.unwrap_or(DEFAULT_COOLDOWN_SECS)),
        }
    }
}
