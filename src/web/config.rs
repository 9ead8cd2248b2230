use serde::{Deserialize, Deserializer};
use std::time::Duration;
use thiserror::Error;

use crate::catalog::DEFAULT_GP_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub station: StationConfig,
    pub satellite: SatelliteConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub predict: PredictConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SatelliteConfig {
    /// Exact object name as listed in the catalog.
    pub name: String,
    #[serde(default = "default_group")]
    pub group: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    /// How long a fetched element set is served before re-fetching.
    #[serde(
        default = "default_refresh_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub refresh_interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictConfig {
    #[serde(default)]
    pub default_min_elevation: f64,
    #[serde(default = "default_timezone")]
    pub timezone: chrono_tz::Tz,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_group() -> String {
    "stations".to_string()
}

fn default_catalog_url() -> String {
    DEFAULT_GP_URL.to_string()
}

fn default_refresh_interval() -> Duration {
    // TLEs for active satellites update a few times a day
    Duration::from_secs(6 * 60 * 60)
}

fn default_timezone() -> chrono_tz::Tz {
    chrono_tz::Tz::UTC
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            default_min_elevation: 0.0,
            timezone: default_timezone(),
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let yaml = r#"
station:
  name: home
  coordinates: "38.7, -9.1"
satellite:
  name: "ISS (ZARYA)"
"#;
        let config: Config = serde_yaml::from_str(yaml).expect("valid config");
        assert_eq!(config.satellite.group, "stations");
        assert_eq!(config.catalog.url, DEFAULT_GP_URL);
        assert_eq!(config.catalog.refresh_interval, Duration::from_secs(21600));
        assert_eq!(config.predict.default_min_elevation, 0.0);
        assert_eq!(config.predict.timezone, chrono_tz::Tz::UTC);
        assert_eq!(config.web.bind, "0.0.0.0:8080");
    }

    #[test]
    fn refresh_interval_parses_humantime() {
        let yaml = r#"
station:
  name: ~
  coordinates: "38.7, -9.1"
satellite:
  name: "ISS (ZARYA)"
catalog:
  refresh_interval: 90m
predict:
  timezone: Europe/Lisbon
  default_min_elevation: 10
"#;
        let config: Config = serde_yaml::from_str(yaml).expect("valid config");
        assert_eq!(config.catalog.refresh_interval, Duration::from_secs(5400));
        assert_eq!(config.predict.timezone, chrono_tz::Europe::Lisbon);
        assert_eq!(config.predict.default_min_elevation, 10.0);
    }
}
