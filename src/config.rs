//! Configuration management for the forecast dashboard
//!
//! Handles loading configuration from a TOML file and environment
//! variables, and validates every setting before use.

use crate::DashboardError;
use crate::models::{Location, Variant, default_api_ceiling, default_locations};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Forecast API settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Page and server settings
    #[serde(default)]
    pub dashboard: DisplayConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Places to fetch forecasts for, in display order
    #[serde(default = "default_locations")]
    pub locations: Vec<Location>,
}

/// Forecast API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// IANA timezone the API reports local times in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Last date the API will serve; the window never extends past it
    #[serde(default = "default_api_ceiling")]
    pub api_ceiling_date: NaiveDate,
}

/// Page and server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Variant rendered when a request does not ask for one
    #[serde(default)]
    pub variant: Variant,
    /// Port the dashboard is served on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Page heading; the variant's own title when unset
    #[serde(default)]
    pub title: Option<String>,
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

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            timezone: default_timezone(),
            api_ceiling_date: default_api_ceiling(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            port: default_port(),
            title: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig::default(),
            dashboard: DisplayConfig::default(),
            logging: LoggingConfig::default(),
            locations: default_locations(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `config_path`, or the default file location
    /// when none is given, then apply environment overrides
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

        // FORECAST_DASHBOARD_WEATHER__TIMEOUT_SECONDS=10 etc.
        builder = builder.add_source(
            Environment::with_prefix("FORECAST_DASHBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DashboardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("forecast-dashboard").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timezone.is_empty() {
            self.weather.timezone = default_timezone();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.locations.is_empty() {
            self.locations = default_locations();
        }
    }

    /// Heading shown on the page for `variant`
    #[must_use]
    pub fn title_for(&self, variant: Variant) -> String {
        self.dashboard
            .title
            .clone()
            .unwrap_or_else(|| variant.title().to_string())
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_locations()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.dashboard.port == 0 {
            return Err(DashboardError::config("Dashboard port cannot be 0").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(DashboardError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        if self.weather.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(DashboardError::config(format!(
                "Unknown timezone '{}'",
                self.weather.timezone
            ))
            .into());
        }

        Ok(())
    }

    fn validate_locations(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(DashboardError::config("At least one location is required").into());
        }

        let mut seen = HashSet::new();
        for location in &self.locations {
            if location.name.trim().is_empty() {
                return Err(DashboardError::config("Location names cannot be empty").into());
            }
            if !seen.insert(location.name.as_str()) {
                return Err(DashboardError::config(format!(
                    "Duplicate location name '{}'",
                    location.name
                ))
                .into());
            }
            if !location.has_valid_coordinates() {
                return Err(DashboardError::config(format!(
                    "Coordinates of '{}' are out of range: {}",
                    location.name,
                    location.format_coordinates()
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.timezone, "Europe/Berlin");
        assert_eq!(config.weather.api_ceiling_date, default_api_ceiling());
        assert_eq!(config.dashboard.variant, Variant::TemperatureComparison);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.locations.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::log_level(|c: &mut DashboardConfig| c.logging.level = "loud".into(), "Invalid log level")]
    #[case::log_format(|c: &mut DashboardConfig| c.logging.format = "xml".into(), "Invalid log format")]
    #[case::port(|c: &mut DashboardConfig| c.dashboard.port = 0, "port cannot be 0")]
    #[case::url(|c: &mut DashboardConfig| c.weather.base_url = "ftp://example.org".into(), "HTTP or HTTPS")]
    #[case::timezone(|c: &mut DashboardConfig| c.weather.timezone = "Mars/Olympus".into(), "Unknown timezone")]
    #[case::no_locations(|c: &mut DashboardConfig| c.locations.clear(), "At least one location")]
    #[case::duplicate(|c: &mut DashboardConfig| c.locations.push(c.locations[0].clone()), "Duplicate location")]
    #[case::latitude(|c: &mut DashboardConfig| c.locations[0].latitude = 95.0, "out of range")]
    fn test_validation_errors(#[case] mutate: fn(&mut DashboardConfig), #[case] expected: &str) {
        let mut config = DashboardConfig::default();
        mutate(&mut config);
        let result = config.validate();
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains(expected), "unexpected message: {message}");
    }

    #[test]
    fn test_apply_defaults_restores_locations() {
        let mut config = DashboardConfig::default();
        config.locations.clear();
        config.weather.timezone.clear();
        config.apply_defaults();
        assert_eq!(config.locations, default_locations());
        assert_eq!(config.weather.timezone, "Europe/Berlin");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[weather]
timezone = "Europe/Amsterdam"
api_ceiling_date = "2027-01-31"

[dashboard]
variant = "daily-range"
port = 9000

[[locations]]
name = "Utrecht"
latitude = 52.09
longitude = 5.12
"#
        )
        .unwrap();

        let config = DashboardConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.weather.timezone, "Europe/Amsterdam");
        assert_eq!(
            config.weather.api_ceiling_date,
            NaiveDate::from_ymd_opt(2027, 1, 31).unwrap()
        );
        assert_eq!(config.dashboard.variant, Variant::DailyRange);
        assert_eq!(config.dashboard.port, 9000);
        assert_eq!(config.locations, vec![Location::new("Utrecht", 52.09, 5.12)]);
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
    }

    #[test]
    fn test_weather_section_has_no_timeout_setting() {
        let weather = serde_json::to_value(WeatherConfig::default()).unwrap();
        let mut keys: Vec<_> = weather.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["api_ceiling_date", "base_url", "timezone"],
            "requests use the transport's default timeout"
        );
    }

    #[test]
    fn test_title_for_variant() {
        let mut config = DashboardConfig::default();
        assert!(
            config
                .title_for(Variant::TemperatureComparison)
                .contains("21 days")
        );
        config.dashboard.title = Some("Holiday weather".to_string());
        assert_eq!(config.title_for(Variant::DailyRange), "Holiday weather");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = DashboardConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("forecast-dashboard"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
