use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable overriding the geocoding API base URL
pub const GEOCODING_URL_ENV: &str = "NIMBUS_GEOCODING_URL";
/// Environment variable overriding the forecast API base URL
pub const FORECAST_URL_ENV: &str = "NIMBUS_FORECAST_URL";

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";

/// A single problem found in a config field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors block startup; warnings are only logged.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigIssue>,
    pub warnings: Vec<ConfigIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(ConfigIssue {
            field,
            message: message.into(),
        });
    }

    fn warning(&mut self, field: &'static str, message: impl Into<String>) {
        self.warnings.push(ConfigIssue {
            field,
            message: message.into(),
        });
    }

    /// All errors joined with "; "
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ConfigIssue::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the geocoding API (`/search` is appended)
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Base URL of the forecast API (`/forecast` is appended)
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of forecast days rendered by the view
    #[serde(default = "default_display_days")]
    pub display_days: usize,

    /// How long fetched results are reused within a session (0 = never expire)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,
}

fn default_geocoding_url() -> String {
    DEFAULT_GEOCODING_URL.to_string()
}

fn default_forecast_url() -> String {
    DEFAULT_FORECAST_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_display_days() -> usize {
    5
}

fn default_cache_ttl_minutes() -> u32 {
    15
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            request_timeout_secs: default_request_timeout_secs(),
            display_days: default_display_days(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, falling back to
    /// defaults when no file exists. Nothing is written back.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and reject it if validation finds errors
    pub fn load_validated() -> Result<Self> {
        Self::load()?.into_validated()
    }

    /// Validate, logging warnings. Fails with `ConfigError::Invalid` when
    /// any field is unusable.
    pub fn into_validated(self) -> Result<Self> {
        let report = self.validate();
        if !report.is_valid() {
            return Err(ConfigError::Invalid(report.error_summary()))
                .context("Configuration validation failed");
        }

        for warning in &report.warnings {
            tracing::warn!("Config warning: {}", warning);
        }
        Ok(self)
    }

    /// Replace the API base URLs with values from the environment, if set.
    ///
    /// `lookup` is injected so tests don't have to mutate process env.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(GEOCODING_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Geocoding URL overridden from {}", GEOCODING_URL_ENV);
            self.weather.geocoding_url = url;
        }
        if let Some(url) = lookup(FORECAST_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("Forecast URL overridden from {}", FORECAST_URL_ENV);
            self.weather.forecast_url = url;
        }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut result = ValidationReport::default();

        validate_url(&self.weather.geocoding_url, "weather.geocoding_url", &mut result);
        validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);

        if self.weather.request_timeout_secs == 0 {
            result.error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120 seconds)",
            );
        }

        if self.weather.display_days == 0 {
            result.error("weather.display_days", "At least one day must be displayed");
        } else if self.weather.display_days > 16 {
            result.warning(
                "weather.display_days",
                "The forecast API returns at most 16 days",
            );
        }

        if self.weather.cache_ttl_minutes == 0 {
            result.warning(
                "weather.cache_ttl_minutes",
                "Cached results never expire during a session",
            );
        }

        result
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nimbus").join("config.toml"))
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &'static str, result: &mut ValidationReport) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.error(field_name, "URL must have a host");
            }

            if url.query().is_some() {
                result.warning(field_name, "Query string on a base URL is ignored");
            }
        }
        Err(e) => {
            result.error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
