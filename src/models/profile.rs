//! Requested-variable profiles
//!
//! A profile selects which hourly and daily series are fetched, how far
//! ahead the window reaches and which charts are drawn.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// Dashboard layout, one per supported variable set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Hourly temperature vs. apparent temperature, plus precipitation
    #[default]
    TemperatureComparison,
    /// Daily min/max band with hourly apparent temperature
    DailyRange,
}

impl Variant {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::TemperatureComparison => "temperature-comparison",
            Variant::DailyRange => "daily-range",
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Variant::TemperatureComparison => "Hourly weather forecast (up to 21 days)",
            Variant::DailyRange => "Daily temperature range and apparent temperature (up to 16 days)",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "temperature-comparison" | "a" => Ok(Variant::TemperatureComparison),
            "daily-range" | "b" => Ok(Variant::DailyRange),
            other => Err(DashboardError::config(format!(
                "Unknown variant '{other}'. Must be one of: temperature-comparison, daily-range"
            ))),
        }
    }
}

/// Hourly series understood by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourlyVariable {
    Temperature,
    ApparentTemperature,
    Precipitation,
}

impl HourlyVariable {
    /// Name used in the API query and response
    #[must_use]
    pub fn api_name(&self) -> &'static str {
        match self {
            HourlyVariable::Temperature => "temperature_2m",
            HourlyVariable::ApparentTemperature => "apparent_temperature",
            HourlyVariable::Precipitation => "precipitation",
        }
    }
}

/// Daily series understood by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DailyVariable {
    TemperatureMin,
    TemperatureMax,
}

impl DailyVariable {
    #[must_use]
    pub fn api_name(&self) -> &'static str {
        match self {
            DailyVariable::TemperatureMin => "temperature_2m_min",
            DailyVariable::TemperatureMax => "temperature_2m_max",
        }
    }
}

/// Variables to request and the look-ahead horizon for one variant.
///
/// Every requested variable is a required field of the rows it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchProfile {
    pub variant: Variant,
    pub hourly: Vec<HourlyVariable>,
    pub daily: Vec<DailyVariable>,
    pub horizon_days: u32,
}

impl FetchProfile {
    #[must_use]
    pub fn temperature_comparison() -> Self {
        Self {
            variant: Variant::TemperatureComparison,
            hourly: vec![
                HourlyVariable::Temperature,
                HourlyVariable::ApparentTemperature,
                HourlyVariable::Precipitation,
            ],
            daily: Vec::new(),
            horizon_days: 21,
        }
    }

    #[must_use]
    pub fn daily_range() -> Self {
        Self {
            variant: Variant::DailyRange,
            hourly: vec![HourlyVariable::ApparentTemperature],
            daily: vec![DailyVariable::TemperatureMin, DailyVariable::TemperatureMax],
            horizon_days: 16,
        }
    }

    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::TemperatureComparison => Self::temperature_comparison(),
            Variant::DailyRange => Self::daily_range(),
        }
    }

    /// Whether the response must carry a `daily` section
    #[must_use]
    pub fn wants_daily(&self) -> bool {
        !self.daily.is_empty()
    }

    /// Comma-separated `hourly` query value
    #[must_use]
    pub fn hourly_query(&self) -> String {
        self.hourly
            .iter()
            .map(HourlyVariable::api_name)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Comma-separated `daily` query value, `None` when no daily series is requested
    #[must_use]
    pub fn daily_query(&self) -> Option<String> {
        if self.daily.is_empty() {
            return None;
        }
        Some(
            self.daily
                .iter()
                .map(DailyVariable::api_name)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}
