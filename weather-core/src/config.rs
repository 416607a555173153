use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, str::FromStr};

use crate::{
    error::WeatherError,
    geocode::GeocoderId,
    http::DEFAULT_TIMEOUT_SECS,
    properties::{self, PropertySpec},
    units::UnitSystem,
};

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    pub const fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Text, OutputFormat::Json]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "human" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(WeatherError::UnknownValue {
                what: "output format",
                value: s.to_string(),
                expected: "text, json",
            }),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
///
/// ```toml
/// geocoder = "open-meteo"
/// units = "metric"
/// format = "text"
/// properties = ["temperature", "humidity", "wind"]
/// contact = "me@example.com"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoder: GeocoderId,
    pub units: UnitSystem,
    pub format: OutputFormat,
    /// Property names, in display order.
    pub properties: Vec<String>,
    /// Contact put in the User-Agent; api.weather.gov asks for one.
    pub contact: String,
    pub timeout_secs: u64,
    /// Override for the api.weather.gov base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nws_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoder: GeocoderId::default(),
            units: UnitSystem::default(),
            format: OutputFormat::default(),
            properties: properties::DEFAULT_PROPERTIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            contact: "weather-cli@example.com".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            nws_base_url: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.property_specs()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(&path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The configured properties, falling back to the defaults when the
    /// list is empty.
    pub fn property_specs(&self) -> Result<Vec<&'static PropertySpec>, WeatherError> {
        let selected = properties::select(&self.properties)?;
        if selected.is_empty() {
            return Ok(properties::defaults());
        }
        Ok(selected)
    }
}
