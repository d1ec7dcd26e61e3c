use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::Place;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Wind speed units understood by the forecast endpoint.
pub const WIND_SPEED_UNITS: &[&str] = &["kmh", "ms", "mph", "kn"];

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// language = "ja"
/// debounce_ms = 500
/// wind_speed_unit = "ms"
///
/// [default_location]
/// name = "Sapporo, Hokkaido, Japan"
/// latitude = 43.06417
/// longitude = 141.34694
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding_url: String,
    pub forecast_url: String,

    /// Language for geocoding results, e.g. "ja" or "en".
    pub language: String,

    /// Candidates requested per geocoding lookup.
    pub result_count: u8,

    /// Quiet period before a typed query is looked up.
    pub debounce_ms: u64,

    /// HTTP timeout applied to both endpoints.
    pub timeout_secs: u64,

    /// One of [`WIND_SPEED_UNITS`]; the service default (km/h) when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed_unit: Option<String>,

    /// Place shown before anything is searched.
    pub default_location: Place,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            language: "ja".to_string(),
            result_count: 5,
            debounce_ms: 500,
            timeout_secs: 10,
            wind_speed_unit: None,
            default_location: Place::tokyo(),
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check values that serde alone cannot.
    pub fn validate(&self) -> Result<()> {
        if self.result_count == 0 {
            return Err(anyhow!("result_count must be at least 1"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be at least 1"));
        }

        if let Some(unit) = &self.wind_speed_unit {
            if !WIND_SPEED_UNITS.contains(&unit.as_str()) {
                return Err(anyhow!(
                    "Unknown wind_speed_unit '{unit}'. Supported units: {}.",
                    WIND_SPEED_UNITS.join(", ")
                ));
            }
        }

        let place = &self.default_location;
        if !(-90.0..=90.0).contains(&place.latitude) || !(-180.0..=180.0).contains(&place.longitude)
        {
            return Err(anyhow!(
                "default_location has invalid coordinates ({}, {})",
                place.latitude,
                place.longitude
            ));
        }

        Ok(())
    }

    /// Load config from the platform location, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
