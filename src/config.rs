//! Configuration management for the `AirDash` pipeline
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings. Credentials are
//! plain session-scoped configuration values, not secrets-managed.

use crate::AirDashError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `AirDash` pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirDashConfig {
    /// EPA AirNow API configuration
    pub airnow: AirNowConfig,
    /// OpenAQ API configuration
    pub openaq: OpenAqConfig,
    /// NOAA weather.gov configuration
    pub weather: WeatherConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Default application settings
    pub defaults: DefaultsConfig,
}

/// EPA AirNow API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirNowConfig {
    /// AirNow API key (required for live air quality data)
    pub api_key: Option<String>,
    /// Base URL for the AirNow API
    #[serde(default = "default_airnow_base_url")]
    pub base_url: String,
    /// Search radius around the query point in miles
    #[serde(default = "default_airnow_distance")]
    pub distance_miles: u32,
}

/// OpenAQ API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAqConfig {
    /// OpenAQ API key; absent key omits the auth header, not an error
    pub api_key: Option<String>,
    /// Base URL for the OpenAQ v3 API
    #[serde(default = "default_openaq_base_url")]
    pub base_url: String,
    /// Country the location catalog is scoped to
    #[serde(default = "default_openaq_country")]
    pub country: String,
}

/// NOAA weather.gov settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Contact identifier sent as User-Agent (email recommended), required by
    /// the weather.gov usage policy
    pub contact: Option<String>,
    /// Base URL for the weather.gov API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Day-count window for time-series fetches
    #[serde(default = "default_days")]
    pub days: u32,
    /// Chart rendering mode handed through to the presentation layer
    #[serde(default)]
    pub chart_mode: ChartMode,
}

/// Chart rendering mode (recognized setting only; rendering happens outside
/// this core)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartMode {
    #[default]
    Line,
    Bar,
    Area,
}

// Default value functions
fn default_airnow_base_url() -> String {
    "https://www.airnowapi.org".to_string()
}

fn default_airnow_distance() -> u32 {
    25
}

fn default_openaq_base_url() -> String {
    "https://api.openaq.org/v3".to_string()
}

fn default_openaq_country() -> String {
    "US".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_days() -> u32 {
    7
}

impl Default for AirDashConfig {
    fn default() -> Self {
        Self {
            airnow: AirNowConfig {
                api_key: None,
                base_url: default_airnow_base_url(),
                distance_miles: default_airnow_distance(),
            },
            openaq: OpenAqConfig {
                api_key: None,
                base_url: default_openaq_base_url(),
                country: default_openaq_country(),
            },
            weather: WeatherConfig {
                contact: None,
                base_url: default_weather_base_url(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
            defaults: DefaultsConfig {
                days: default_days(),
                chart_mode: ChartMode::default(),
            },
        }
    }
}

impl AirDashConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides with AIRDASH_ prefix, e.g. AIRDASH_AIRNOW__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("AIRDASH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirDashConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airdash").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.airnow.base_url.is_empty() {
            self.airnow.base_url = default_airnow_base_url();
        }
        if self.airnow.distance_miles == 0 {
            self.airnow.distance_miles = default_airnow_distance();
        }
        if self.openaq.base_url.is_empty() {
            self.openaq.base_url = default_openaq_base_url();
        }
        if self.openaq.country.is_empty() {
            self.openaq.country = default_openaq_country();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.days == 0 {
            self.defaults.days = default_days();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.airnow.api_key {
            if api_key.is_empty() {
                return Err(AirDashError::config(
                    "AirNow API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }
        }

        if let Some(api_key) = &self.openaq.api_key {
            if api_key.is_empty() {
                return Err(AirDashError::config(
                    "OpenAQ API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }
        }

        if let Some(contact) = &self.weather.contact {
            if contact.trim().is_empty() {
                return Err(AirDashError::config(
                    "Weather contact identifier cannot be blank if provided.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.airnow.distance_miles > 500 {
            return Err(
                AirDashError::config("AirNow search radius cannot exceed 500 miles").into(),
            );
        }

        if self.defaults.days > 90 {
            return Err(
                AirDashError::config("Time-series window cannot exceed 90 days").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirDashError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirDashError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("AirNow", &self.airnow.base_url),
            ("OpenAQ", &self.openaq.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AirDashError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
